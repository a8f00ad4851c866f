use serde_json::{Map, Value};

use crate::catalog::graph::CatalogEntity;
use crate::catalog::model::Id;
use crate::config::CatalogSettings;
use crate::error::{AppError, AppResult};
use crate::response::Meta;

use super::directives::Directives;
use super::registry::{Projectable, ProjectionContext};

/// Rejects directives that name fields the entity does not have.
pub fn validate<T: Projectable>(directives: &Directives) -> AppResult<()> {
    let registry = T::registry();
    match directives
        .referenced_fields()
        .find(|name| !registry.contains(name))
    {
        Some(unknown) => Err(AppError::InvalidQuery(format!("unknown field {unknown}"))),
        None => Ok(()),
    }
}

/// Every field in its compact form. Used for expanded relations, which do
/// not pass the caller's directives further down.
pub fn project_default<T: Projectable>(entity: &T, ctx: &ProjectionContext<'_>) -> Value {
    let mut out = Map::new();
    for field in T::registry().fields() {
        out.insert(field.name.to_string(), (field.compact)(entity, ctx));
    }
    Value::Object(out)
}

fn render<T: Projectable>(entity: &T, ctx: &ProjectionContext<'_>, directives: &Directives) -> Value {
    let mut out = Map::new();
    for field in T::registry().fields() {
        let expand = directives.expands(field.name);
        if directives.excludes(field.name) && !expand {
            continue;
        }
        let value = match (expand, field.expanded) {
            (true, Some(expanded)) => expanded(entity, ctx),
            _ => (field.compact)(entity, ctx),
        };
        out.insert(field.name.to_string(), value);
    }
    Value::Object(out)
}

pub fn project<T: Projectable>(
    entity: &T,
    ctx: &ProjectionContext<'_>,
    directives: &Directives,
) -> AppResult<Value> {
    validate::<T>(directives)?;
    Ok(render(entity, ctx, directives))
}

/// Filters, paginates and renders a list. `meta` is only produced when a
/// page was requested.
pub fn project_list<T: Projectable>(
    entities: Vec<&T>,
    ctx: &ProjectionContext<'_>,
    directives: &Directives,
    settings: &CatalogSettings,
) -> AppResult<(Value, Option<Meta>)> {
    validate::<T>(directives)?;
    let registry = T::registry();

    let filtered: Vec<&T> = entities
        .into_iter()
        .filter(|entity| {
            directives.filter.iter().all(|(name, predicate)| {
                registry
                    .get(name)
                    .is_some_and(|field| predicate.matches(&(field.compact)(entity, ctx)))
            })
        })
        .collect();
    let total = filtered.len() as u64;

    let (selected, meta) = match directives.page {
        Some(request) => {
            let (page, limit, offset) =
                request.normalize(settings.default_page_limit, settings.max_page_limit);
            let selected: Vec<&T> = filtered
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect();
            (selected, Some(Meta::new(page, limit, total)))
        }
        None => (filtered, None),
    };

    let items = selected
        .into_iter()
        .map(|entity| render(entity, ctx, directives))
        .collect();
    Ok((Value::Array(items), meta))
}

/// Default projection of a related record, `null` if it is gone.
pub fn expand_one<E>(ctx: &ProjectionContext<'_>, id: Id) -> Value
where
    E: Projectable + CatalogEntity<Key = Id>,
{
    ctx.graph
        .get::<E>(&id)
        .map_or(Value::Null, |entity| project_default(entity, ctx))
}

pub fn expand_many<E>(ctx: &ProjectionContext<'_>, ids: Vec<Id>) -> Value
where
    E: Projectable + CatalogEntity<Key = Id>,
{
    Value::Array(
        ids.into_iter()
            .filter_map(|id| ctx.graph.get::<E>(&id).ok())
            .map(|entity| project_default(entity, ctx))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::graph::CatalogGraph;
    use crate::catalog::intl::TextField;
    use crate::catalog::model::{Category, EntityKind, Product, ProductType, Relation};
    use crate::catalog::model::{FeatureType, FeatureValue};
    use crate::projection::directives::DirectiveQuery;
    use serde_json::json;
    use uuid::Uuid;

    const PHONE: u128 = 1;
    const IPHONE: u128 = 2;

    fn settings() -> CatalogSettings {
        CatalogSettings::default()
    }

    fn catalog(products: u128) -> CatalogGraph {
        let mut graph = CatalogGraph::new();
        let phone = Uuid::from_u128(PHONE);
        let iphone = Uuid::from_u128(IPHONE);
        graph.insert(Category { id: phone });
        graph.set_text(
            EntityKind::Category,
            phone,
            TextField::Name,
            &[("en", "Phone"), ("ru", "Телефон")].into_iter().collect(),
        );
        graph.insert(ProductType {
            id: iphone,
            category: phone,
            image: None,
        });
        graph.set_text(
            EntityKind::ProductType,
            iphone,
            TextField::Name,
            &[("en", "iPhone")].into_iter().collect(),
        );
        for n in 0..products {
            graph.insert(Product {
                id: Uuid::from_u128(1000 + n),
                price: 100 * n as i64,
                discount: 0,
                quantity: 1,
                product_type: iphone,
                images: Vec::new(),
            });
        }
        graph
    }

    fn directives(pairs: &[(&str, &str)]) -> AppResult<Directives> {
        let mut query = DirectiveQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "exclude" => query.exclude = value,
                "serialize" => query.serialize = value,
                "filter" => query.filter = value,
                "page" => query.page = value,
                "limit" => query.limit = value,
                _ => unreachable!(),
            }
        }
        Directives::parse(&query)
    }

    #[test]
    fn second_page_of_forty_five() {
        let graph = catalog(45);
        let ctx = ProjectionContext::new(&graph, "en", Some("en"));
        let directives = directives(&[("page", "2"), ("limit", "20")]).unwrap();

        let (items, meta) =
            project_list(graph.list::<Product>(), &ctx, &directives, &settings()).unwrap();

        let items = items.as_array().unwrap();
        assert_eq!(items.len(), 20);
        assert_eq!(items[0]["id"], json!(Uuid::from_u128(1020)));
        assert_eq!(items[19]["id"], json!(Uuid::from_u128(1039)));
        let meta = meta.unwrap();
        assert_eq!((meta.page, meta.limit, meta.total), (2, 20, 45));
    }

    #[test]
    fn last_partial_page_and_page_past_the_end() {
        let graph = catalog(45);
        let ctx = ProjectionContext::new(&graph, "en", None);

        let (items, _) = project_list(
            graph.list::<Product>(),
            &ctx,
            &directives(&[("page", "3")]).unwrap(),
            &settings(),
        )
        .unwrap();
        assert_eq!(items.as_array().unwrap().len(), 5);

        let (items, meta) = project_list(
            graph.list::<Product>(),
            &ctx,
            &directives(&[("page", "9")]).unwrap(),
            &settings(),
        )
        .unwrap();
        assert!(items.as_array().unwrap().is_empty());
        assert_eq!(meta.unwrap().total, 45);
    }

    #[test]
    fn huge_page_is_empty_instead_of_overflowing() {
        let graph = catalog(3);
        let ctx = ProjectionContext::new(&graph, "en", None);
        let (items, meta) = project_list(
            graph.list::<Product>(),
            &ctx,
            &directives(&[("page", "1000000000000000000"), ("limit", "100")]).unwrap(),
            &settings(),
        )
        .unwrap();
        assert!(items.as_array().unwrap().is_empty());
        let meta = meta.unwrap();
        assert_eq!((meta.limit, meta.total), (100, 3));
    }

    #[test]
    fn empty_directives_give_exactly_the_default_fields() {
        fn keys(value: &Value) -> Vec<&str> {
            let mut keys: Vec<&str> = value
                .as_object()
                .unwrap()
                .keys()
                .map(String::as_str)
                .collect();
            keys.sort_unstable();
            keys
        }

        let graph = catalog(1);
        let ctx = ProjectionContext::new(&graph, "en", None);
        let empty = directives(&[("exclude", "[]"), ("serialize", "[]")]).unwrap();

        let iphone = graph.get::<ProductType>(&Uuid::from_u128(IPHONE)).unwrap();
        let out = project(iphone, &ctx, &empty).unwrap();
        assert_eq!(
            keys(&out),
            vec![
                "category",
                "description",
                "feature_values",
                "id",
                "image",
                "name",
                "short_description"
            ]
        );
        assert_eq!(out, project_default(iphone, &ctx));

        let product = graph.get::<Product>(&Uuid::from_u128(1000)).unwrap();
        let out = project(product, &ctx, &empty).unwrap();
        assert_eq!(
            keys(&out),
            vec![
                "discount",
                "feature_values",
                "id",
                "images",
                "price",
                "product_type",
                "quantity"
            ]
        );
        assert_eq!(out["product_type"], json!(Uuid::from_u128(IPHONE)));
        assert_eq!(out, project_default(product, &ctx));
    }

    #[test]
    fn whole_list_without_page_has_no_meta() {
        let graph = catalog(3);
        let ctx = ProjectionContext::new(&graph, "en", None);
        let (items, meta) = project_list(
            graph.list::<Product>(),
            &ctx,
            &Directives::default(),
            &settings(),
        )
        .unwrap();
        assert_eq!(items.as_array().unwrap().len(), 3);
        assert!(meta.is_none());
    }

    #[test]
    fn filter_narrows_before_paginating() {
        let graph = catalog(45);
        let ctx = ProjectionContext::new(&graph, "en", None);
        let directives =
            directives(&[("filter", r#"{"price":{"gte":1000}}"#), ("page", "1"), ("limit", "5")])
                .unwrap();
        let (items, meta) =
            project_list(graph.list::<Product>(), &ctx, &directives, &settings()).unwrap();
        assert_eq!(items[0]["price"], json!(1000));
        assert_eq!(meta.unwrap().total, 35);
    }

    #[test]
    fn unknown_field_is_an_invalid_query() {
        let graph = catalog(1);
        let ctx = ProjectionContext::new(&graph, "en", None);
        for pairs in [
            [("filter", r#"{"colour":"red"}"#)],
            [("exclude", "colour")],
            [("serialize", "colour")],
        ] {
            let err = project_list(
                graph.list::<Product>(),
                &ctx,
                &directives(&pairs).unwrap(),
                &settings(),
            )
            .unwrap_err();
            assert!(matches!(err, AppError::InvalidQuery(_)));
        }
    }

    #[test]
    fn exclude_drops_the_field() {
        let graph = catalog(0);
        let ctx = ProjectionContext::new(&graph, "en", None);
        let category = graph.get::<Category>(&Uuid::from_u128(PHONE)).unwrap();

        let value = project(category, &ctx, &directives(&[("exclude", r#"["name"]"#)]).unwrap())
            .unwrap();
        assert_eq!(
            value,
            json!({"id": Uuid::from_u128(PHONE), "feature_types": []})
        );
    }

    #[test]
    fn serialize_expands_one_level() {
        let graph = catalog(0);
        let ctx = ProjectionContext::new(&graph, "ru", Some("en"));
        let product_type = graph.get::<ProductType>(&Uuid::from_u128(IPHONE)).unwrap();

        let compact = project(product_type, &ctx, &Directives::default()).unwrap();
        assert_eq!(compact["category"], json!(Uuid::from_u128(PHONE)));
        assert_eq!(compact["name"], json!("iPhone"));
        assert_eq!(compact["description"], Value::Null);

        let expanded =
            project(product_type, &ctx, &directives(&[("serialize", "category")]).unwrap())
                .unwrap();
        assert_eq!(
            expanded["category"],
            json!({"id": Uuid::from_u128(PHONE), "name": "Телефон", "feature_types": []})
        );
    }

    #[test]
    fn expansion_wins_over_exclusion() {
        let graph = catalog(0);
        let ctx = ProjectionContext::new(&graph, "en", None);
        let product_type = graph.get::<ProductType>(&Uuid::from_u128(IPHONE)).unwrap();
        let value = project(
            product_type,
            &ctx,
            &directives(&[("exclude", "category,name"), ("serialize", "category")]).unwrap(),
        )
        .unwrap();
        assert!(value.get("name").is_none());
        assert_eq!(value["category"]["name"], json!("Phone"));
    }

    #[test]
    fn to_many_relations_list_ids_and_expand_to_records() {
        let mut graph = catalog(0);
        let phone = Uuid::from_u128(PHONE);
        let (ram, color) = (Uuid::from_u128(10), Uuid::from_u128(11));
        graph.insert(FeatureType { id: ram });
        graph.insert(FeatureType { id: color });
        graph.insert(FeatureValue {
            id: Uuid::from_u128(20),
            feature_type: ram,
        });
        graph
            .set_members(Relation::CategoryFeatureTypes, phone, &[color, ram])
            .unwrap();
        let ctx = ProjectionContext::new(&graph, "en", None);
        let category = graph.get::<Category>(&phone).unwrap();

        let compact = project(category, &ctx, &Directives::default()).unwrap();
        assert_eq!(compact["feature_types"], json!([ram, color]));

        let expanded =
            project(category, &ctx, &directives(&[("serialize", "feature_types")]).unwrap())
                .unwrap();
        assert_eq!(
            expanded["feature_types"][0],
            json!({
                "id": ram,
                "name": null,
                "categories": [phone],
                "feature_values": [Uuid::from_u128(20)],
            })
        );
    }

    #[test]
    fn projection_is_deterministic() {
        let graph = catalog(10);
        let ctx = ProjectionContext::new(&graph, "en", None);
        let directives = directives(&[("serialize", "product_type"), ("page", "1")]).unwrap();
        let first = project_list(graph.list::<Product>(), &ctx, &directives, &settings()).unwrap();
        let second = project_list(graph.list::<Product>(), &ctx, &directives, &settings()).unwrap();
        assert_eq!(
            serde_json::to_string(&first.0).unwrap(),
            serde_json::to_string(&second.0).unwrap()
        );
    }
}
