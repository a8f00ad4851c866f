use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::ProductPayload,
    error::{AppResult, FieldErrors},
    middleware::language::RequestLanguage,
    projection::DirectiveQuery,
    response::ApiResponse,
    routes::params::request_context,
    services::{Creatable, Deletable, Paginatable, ProductService, Readable, Updatable},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(DirectiveQuery),
    responses(
        (status = 200, description = "List products", body = ApiResponse),
        (status = 400, description = "Invalid directives", body = FieldErrors),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(ProductService.list(&state, &ctx).await?))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID"), DirectiveQuery),
    responses(
        (status = 200, description = "Get product", body = ApiResponse),
        (status = 404, description = "Product not found", body = FieldErrors),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(ProductService.get(&state, &ctx, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/products",
    params(DirectiveQuery),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Create product", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<ProductPayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(ProductService.create(&state, &ctx, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID"), DirectiveQuery),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Update product", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
        (status = 404, description = "Product not found", body = FieldErrors),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<ProductPayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(ProductService.update(&state, &ctx, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 400, description = "Still in use", body = FieldErrors),
        (status = 404, description = "Product not found", body = FieldErrors),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    Ok(Json(ProductService.delete(&state, id).await?))
}
