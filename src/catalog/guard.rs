//! Conflicts caught before they reach storage: duplicate names, deletions
//! of records that are still referenced, and edits that would strand
//! dependent records outside their legal scope.

use sea_orm::{DbErr, SqlErr};

use crate::error::{AppError, AppResult};

use super::graph::CatalogGraph;
use super::intl::{LocalizedText, TextField};
use super::model::{EntityKind, FeatureValue, Id, Product, ProductType, PromoCode, Relation};

/// Fails when another record of `kind` already uses one of `text`'s values in
/// the same language. Comparison is exact and case-sensitive.
pub fn ensure_unique_text(
    graph: &CatalogGraph,
    kind: EntityKind,
    field: TextField,
    text: &LocalizedText,
    current: Option<Id>,
) -> AppResult<()> {
    let taken = graph
        .texts()
        .field_values(kind, field)
        .filter(|(id, _)| Some(*id) != current)
        .any(|(_, other)| {
            text.iter()
                .any(|(language, value)| other.get(language) == Some(value))
        });

    if taken {
        tracing::debug!(kind = %kind, field = field.as_str(), "duplicate localized value");
        return Err(AppError::DuplicateName {
            kind,
            field: field.as_str(),
        });
    }
    Ok(())
}

/// Promo code values are compared after lowercasing.
pub fn ensure_unique_promo_code(
    graph: &CatalogGraph,
    value: &str,
    current: Option<Id>,
) -> AppResult<()> {
    let value = value.to_lowercase();
    let taken = graph
        .list_by::<PromoCode>(|code| code.value == value && Some(code.id) != current)
        .into_iter()
        .next()
        .is_some();
    if taken {
        return Err(AppError::DuplicateName {
            kind: EntityKind::PromoCode,
            field: "value",
        });
    }
    Ok(())
}

/// Maps a storage unique-constraint failure onto the field it guards. Any
/// other storage failure passes through untouched.
pub fn translate_duplicate_key(err: DbErr, kind: EntityKind, field: &'static str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(kind = %kind, field, detail = %detail, "duplicate key from storage");
            AppError::DuplicateName { kind, field }
        }
        _ => err.into(),
    }
}

/// Deletion is refused while other records depend on the target.
pub fn ensure_deletable(graph: &CatalogGraph, kind: EntityKind, id: Id) -> AppResult<()> {
    let in_use = match kind {
        EntityKind::FeatureType => !graph.values_of(id).is_empty(),
        EntityKind::Category => !graph
            .list_by::<ProductType>(|product_type| product_type.category == id)
            .is_empty(),
        EntityKind::ProductType => !graph
            .list_by::<Product>(|product| product.product_type == id)
            .is_empty(),
        EntityKind::PromoCode => graph.orders_using(id) > 0,
        _ => false,
    };

    if in_use {
        return Err(AppError::InUse {
            kind,
            id,
            field: None,
        });
    }
    Ok(())
}

/// A category may only drop feature types none of its product types use.
pub fn ensure_category_scope_kept(
    graph: &CatalogGraph,
    category: Id,
    feature_types: &[Id],
) -> AppResult<()> {
    for product_type in graph.list_by::<ProductType>(|product_type| product_type.category == category)
    {
        for value in graph.members_of(Relation::ProductTypeFeatureValues, product_type.id) {
            let value = graph.get::<FeatureValue>(&value)?;
            if !feature_types.contains(&value.feature_type) {
                return Err(AppError::InUse {
                    kind: EntityKind::Category,
                    id: category,
                    field: Some("feature_types"),
                });
            }
        }
    }
    Ok(())
}

/// A product type may only stop allowing values none of its products chose.
pub fn ensure_variants_kept(
    graph: &CatalogGraph,
    product_type: Id,
    allowed: &[Id],
) -> AppResult<()> {
    for product in graph.list_by::<Product>(|product| product.product_type == product_type) {
        let stranded = graph
            .members_of(Relation::ProductFeatureValues, product.id)
            .iter()
            .any(|value| !allowed.contains(value));
        if stranded {
            return Err(AppError::InUse {
                kind: EntityKind::ProductType,
                id: product_type,
                field: Some("feature_values"),
            });
        }
    }
    Ok(())
}

/// A feature value may not move to another feature type while anything
/// allows or chooses it.
pub fn ensure_value_unreferenced(graph: &CatalogGraph, value: Id) -> AppResult<()> {
    let referenced = !graph
        .owners_of(Relation::ProductTypeFeatureValues, value)
        .is_empty()
        || !graph
            .owners_of(Relation::ProductFeatureValues, value)
            .is_empty();
    if referenced {
        return Err(AppError::InUse {
            kind: EntityKind::FeatureValue,
            id: value,
            field: Some("feature_type"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{Category, FeatureType, Order};
    use uuid::Uuid;

    fn named_categories() -> (CatalogGraph, Id, Id) {
        let mut graph = CatalogGraph::new();
        let (phone, laptop) = (Uuid::from_u128(1), Uuid::from_u128(2));
        graph.insert(Category { id: phone });
        graph.insert(Category { id: laptop });
        graph.set_text(
            EntityKind::Category,
            phone,
            TextField::Name,
            &[("en", "Phone"), ("ru", "Телефон")].into_iter().collect(),
        );
        graph.set_text(
            EntityKind::Category,
            laptop,
            TextField::Name,
            &[("en", "Laptop")].into_iter().collect(),
        );
        (graph, phone, laptop)
    }

    #[test]
    fn same_name_in_same_language_conflicts() {
        let (graph, _, _) = named_categories();
        let candidate: LocalizedText = [("en", "Tablet"), ("ru", "Телефон")].into_iter().collect();
        let err = ensure_unique_text(&graph, EntityKind::Category, TextField::Name, &candidate, None)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::DuplicateName {
                kind: EntityKind::Category,
                field: "name"
            }
        ));
    }

    #[test]
    fn uniqueness_is_per_language_and_case_sensitive() {
        let (graph, _, _) = named_categories();
        let other_language: LocalizedText = [("ru", "Phone")].into_iter().collect();
        let other_case: LocalizedText = [("en", "phone")].into_iter().collect();
        for candidate in [other_language, other_case] {
            assert!(
                ensure_unique_text(&graph, EntityKind::Category, TextField::Name, &candidate, None)
                    .is_ok()
            );
        }
    }

    #[test]
    fn a_record_does_not_conflict_with_itself() {
        let (graph, phone, _) = named_categories();
        let same: LocalizedText = [("en", "Phone")].into_iter().collect();
        assert!(
            ensure_unique_text(&graph, EntityKind::Category, TextField::Name, &same, Some(phone))
                .is_ok()
        );
    }

    #[test]
    fn promo_codes_compare_lowercased() {
        let mut graph = CatalogGraph::new();
        graph.insert(PromoCode {
            id: Uuid::from_u128(5),
            value: "spring".into(),
            discount: 10,
            is_active: true,
            disable_on_use: false,
        });
        assert!(ensure_unique_promo_code(&graph, "SPRING", None).is_err());
        assert!(ensure_unique_promo_code(&graph, "SPRING", Some(Uuid::from_u128(5))).is_ok());
        assert!(ensure_unique_promo_code(&graph, "summer", None).is_ok());
    }

    #[test]
    fn feature_type_with_values_cannot_be_deleted() {
        let mut graph = CatalogGraph::new();
        let (ram, empty) = (Uuid::from_u128(10), Uuid::from_u128(11));
        graph.insert(FeatureType { id: ram });
        graph.insert(FeatureType { id: empty });
        graph.insert(FeatureValue {
            id: Uuid::from_u128(20),
            feature_type: ram,
        });

        assert!(matches!(
            ensure_deletable(&graph, EntityKind::FeatureType, ram),
            Err(AppError::InUse { field: None, .. })
        ));
        assert!(ensure_deletable(&graph, EntityKind::FeatureType, empty).is_ok());
    }

    #[test]
    fn promo_code_used_by_an_order_cannot_be_deleted() {
        let mut graph = CatalogGraph::new();
        let code = Uuid::from_u128(5);
        graph.insert(PromoCode {
            id: code,
            value: "spring".into(),
            discount: 10,
            is_active: true,
            disable_on_use: true,
        });
        assert!(ensure_deletable(&graph, EntityKind::PromoCode, code).is_ok());

        graph.insert(Order {
            id: Uuid::from_u128(6),
            promo_code: Some(code),
        });
        assert!(ensure_deletable(&graph, EntityKind::PromoCode, code).is_err());
    }

    #[test]
    fn category_cannot_drop_a_feature_type_its_product_types_use() {
        let mut graph = CatalogGraph::new();
        let (phone, ram, color) = (Uuid::from_u128(1), Uuid::from_u128(10), Uuid::from_u128(11));
        let (gb64, iphone) = (Uuid::from_u128(20), Uuid::from_u128(30));
        graph.insert(Category { id: phone });
        graph.insert(FeatureType { id: ram });
        graph.insert(FeatureType { id: color });
        graph.insert(FeatureValue {
            id: gb64,
            feature_type: ram,
        });
        graph.insert(ProductType {
            id: iphone,
            category: phone,
            image: None,
        });
        graph
            .set_members(Relation::ProductTypeFeatureValues, iphone, &[gb64])
            .unwrap();

        assert!(ensure_category_scope_kept(&graph, phone, &[ram, color]).is_ok());
        let err = ensure_category_scope_kept(&graph, phone, &[color]).unwrap_err();
        assert_eq!(err.field(), Some("feature_types"));
    }
}
