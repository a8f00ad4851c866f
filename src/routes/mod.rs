use axum::Router;

use crate::state::AppState;

pub mod categories;
pub mod doc;
pub mod feature_types;
pub mod feature_values;
pub mod health;
pub mod languages;
pub mod params;
pub mod product_types;
pub mod products;
pub mod promo_codes;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/languages", languages::router())
        .nest("/categories", categories::router())
        .nest("/feature_types", feature_types::router())
        .nest("/feature_values", feature_values::router())
        .nest("/product_types", product_types::router())
        .nest("/products", products::router())
        .nest("/promo_codes", promo_codes::router())
}
