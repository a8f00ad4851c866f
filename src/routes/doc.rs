use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        categories::CategoryPayload, feature_types::FeatureTypePayload,
        feature_values::FeatureValuePayload, product_types::ProductTypePayload,
        products::ProductPayload, promo_codes::PromoCodePayload,
    },
    error::FieldErrors,
    projection::DirectiveQuery,
    response::{ApiResponse, Meta},
    routes::{
        categories, feature_types, feature_values, health, languages, product_types, products,
        promo_codes,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        languages::list_languages,
        languages::get_language,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        feature_types::list_feature_types,
        feature_types::get_feature_type,
        feature_types::create_feature_type,
        feature_types::update_feature_type,
        feature_types::delete_feature_type,
        feature_values::list_feature_values,
        feature_values::get_feature_value,
        feature_values::create_feature_value,
        feature_values::update_feature_value,
        feature_values::delete_feature_value,
        product_types::list_product_types,
        product_types::get_product_type,
        product_types::create_product_type,
        product_types::update_product_type,
        product_types::delete_product_type,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        promo_codes::list_promo_codes,
        promo_codes::get_promo_code,
        promo_codes::create_promo_code,
        promo_codes::update_promo_code,
        promo_codes::delete_promo_code
    ),
    components(
        schemas(
            ApiResponse,
            Meta,
            FieldErrors,
            DirectiveQuery,
            CategoryPayload,
            FeatureTypePayload,
            FeatureValuePayload,
            ProductTypePayload,
            ProductPayload,
            PromoCodePayload
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Languages", description = "Languages texts can be written in"),
        (name = "Categories", description = "Categories and the feature types they use"),
        (name = "Feature types", description = "Variant dimensions such as RAM or color"),
        (name = "Feature values", description = "Concrete values of a feature type"),
        (name = "Product types", description = "Product types and their allowed feature values"),
        (name = "Products", description = "Sellable variants of a product type"),
        (name = "Promo codes", description = "Discount codes"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
