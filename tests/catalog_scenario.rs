use axum_catalog_api::{
    catalog::{
        CatalogGraph, EntityKind, LocalizedText, TextField,
        guard,
        model::{Category, FeatureType, FeatureValue, Product, ProductType, Relation},
        variants::{AllowedSet, check_category_scope, check_product_variant},
    },
    error::AppError,
    projection::{DirectiveQuery, Directives, ProjectionContext, project},
};
use serde_json::json;
use uuid::Uuid;

// A phone category that varies by RAM and color, one product type and one product.
struct Shop {
    graph: CatalogGraph,
    phone: Uuid,
    pixel: Uuid,
    product: Uuid,
    gb4: Uuid,
    gb8: Uuid,
    black: Uuid,
}

fn name(en: &str, ru: &str) -> LocalizedText {
    [("en", en), ("ru", ru)].into_iter().collect()
}

fn shop() -> Shop {
    let id = Uuid::from_u128;
    let mut graph = CatalogGraph::new();
    let (phone, ram, color) = (id(1), id(2), id(3));
    let (gb4, gb8, black) = (id(4), id(5), id(6));
    let (pixel, product) = (id(7), id(8));

    graph.insert(Category { id: phone });
    graph.set_text(EntityKind::Category, phone, TextField::Name, &name("Phone", "Телефон"));
    for feature_type in [ram, color] {
        graph.insert(FeatureType { id: feature_type });
        graph
            .add_member(Relation::CategoryFeatureTypes, phone, feature_type)
            .unwrap();
    }
    for (value, feature_type) in [(gb4, ram), (gb8, ram), (black, color)] {
        graph.insert(FeatureValue {
            id: value,
            feature_type,
        });
    }

    graph.insert(ProductType {
        id: pixel,
        category: phone,
        image: None,
    });
    graph.set_text(EntityKind::ProductType, pixel, TextField::Name, &name("Pixel", "Пиксель"));
    let description: LocalizedText = [("en", "A phone")].into_iter().collect();
    graph.set_text(EntityKind::ProductType, pixel, TextField::Description, &description);
    graph
        .set_members(Relation::ProductTypeFeatureValues, pixel, &[gb4, gb8, black])
        .unwrap();

    graph.insert(Product {
        id: product,
        price: 49_900,
        discount: 0,
        quantity: 3,
        product_type: pixel,
        images: vec!["/media/front.png".into()],
    });
    graph
        .set_members(Relation::ProductFeatureValues, product, &[gb8, black])
        .unwrap();

    Shop {
        graph,
        phone,
        pixel,
        product,
        gb4,
        gb8,
        black,
    }
}

#[test]
fn product_type_may_allow_only_values_of_its_category() {
    let shop = shop();
    let allowed = AllowedSet::for_category(&shop.graph, shop.phone).unwrap();
    assert_eq!(allowed.len(), 3);

    let accepted =
        check_category_scope(&shop.graph, &allowed, &[shop.black, shop.gb4, shop.black]).unwrap();
    assert_eq!(accepted, vec![shop.black, shop.gb4]);
}

#[test]
fn product_picks_one_value_per_dimension() {
    let shop = shop();
    let allowed = AllowedSet::for_product_type(&shop.graph, shop.pixel).unwrap();

    let variant = check_product_variant(&shop.graph, &allowed, &[shop.gb4, shop.black]).unwrap();
    assert_eq!(variant, vec![shop.gb4, shop.black]);

    let err = check_product_variant(&shop.graph, &allowed, &[shop.gb4, shop.gb8]).unwrap_err();
    assert!(matches!(err, AppError::InvalidFeatureValue(id) if id == shop.gb8));
}

#[test]
fn expanded_product_type_is_rendered_in_the_request_language() {
    let shop = shop();
    let directives = Directives::parse(&DirectiveQuery {
        serialize: Some("product_type".into()),
        exclude: Some("images".into()),
        ..Default::default()
    })
    .unwrap();
    let ctx = ProjectionContext::new(&shop.graph, "ru", Some("en"));
    let product = shop.graph.get::<Product>(&shop.product).unwrap();

    let out = project(product, &ctx, &directives).unwrap();
    assert!(out.get("images").is_none());
    assert_eq!(out["feature_values"], json!([shop.gb8, shop.black]));
    assert_eq!(out["product_type"]["id"], json!(shop.pixel));
    assert_eq!(out["product_type"]["name"], "Пиксель");
    // No Russian description, so the fallback language is used.
    assert_eq!(out["product_type"]["description"], "A phone");
    assert_eq!(out["product_type"]["category"], json!(shop.phone));
}

#[test]
fn missing_text_without_fallback_is_null() {
    let shop = shop();
    let ctx = ProjectionContext::new(&shop.graph, "ru", None);
    let pixel = shop.graph.get::<ProductType>(&shop.pixel).unwrap();
    let out = project(pixel, &ctx, &Directives::default()).unwrap();
    assert_eq!(out["name"], "Пиксель");
    assert!(out["description"].is_null());
}

#[test]
fn records_in_use_cannot_be_deleted() {
    let shop = shop();
    for (kind, id) in [
        (EntityKind::Category, shop.phone),
        (EntityKind::ProductType, shop.pixel),
    ] {
        let err = guard::ensure_deletable(&shop.graph, kind, id).unwrap_err();
        assert!(matches!(err, AppError::InUse { .. }), "{kind}");
    }
    guard::ensure_deletable(&shop.graph, EntityKind::Product, shop.product).unwrap();
}
