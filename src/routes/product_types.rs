use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::product_types::ProductTypePayload,
    error::{AppResult, FieldErrors},
    middleware::language::RequestLanguage,
    projection::DirectiveQuery,
    response::ApiResponse,
    routes::params::request_context,
    services::{Creatable, Deletable, Paginatable, ProductTypeService, Readable, Updatable},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_product_types).post(create_product_type))
        .route(
            "/{id}",
            get(get_product_type).put(update_product_type).delete(delete_product_type),
        )
}

#[utoipa::path(
    get,
    path = "/api/product_types",
    params(DirectiveQuery),
    responses(
        (status = 200, description = "List product types", body = ApiResponse),
        (status = 400, description = "Invalid directives", body = FieldErrors),
    ),
    tag = "Product types"
)]
pub async fn list_product_types(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(ProductTypeService.list(&state, &ctx).await?))
}

#[utoipa::path(
    get,
    path = "/api/product_types/{id}",
    params(("id" = Uuid, Path, description = "Product type ID"), DirectiveQuery),
    responses(
        (status = 200, description = "Get product type", body = ApiResponse),
        (status = 404, description = "Product type not found", body = FieldErrors),
    ),
    tag = "Product types"
)]
pub async fn get_product_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(ProductTypeService.get(&state, &ctx, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/product_types",
    params(DirectiveQuery),
    request_body = ProductTypePayload,
    responses(
        (status = 200, description = "Create product type", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
    ),
    tag = "Product types"
)]
pub async fn create_product_type(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<ProductTypePayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(ProductTypeService.create(&state, &ctx, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/product_types/{id}",
    params(("id" = Uuid, Path, description = "Product type ID"), DirectiveQuery),
    request_body = ProductTypePayload,
    responses(
        (status = 200, description = "Update product type", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
        (status = 404, description = "Product type not found", body = FieldErrors),
    ),
    tag = "Product types"
)]
pub async fn update_product_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<ProductTypePayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(ProductTypeService.update(&state, &ctx, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/product_types/{id}",
    params(("id" = Uuid, Path, description = "Product type ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 400, description = "Still in use", body = FieldErrors),
        (status = 404, description = "Product type not found", body = FieldErrors),
    ),
    tag = "Product types"
)]
pub async fn delete_product_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    Ok(Json(ProductTypeService.delete(&state, id).await?))
}
