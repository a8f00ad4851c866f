use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::categories::CategoryPayload,
    error::{AppResult, FieldErrors},
    middleware::language::RequestLanguage,
    projection::DirectiveQuery,
    response::ApiResponse,
    routes::params::request_context,
    services::{CategoryService, Creatable, Deletable, Paginatable, Readable, Updatable},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(DirectiveQuery),
    responses(
        (status = 200, description = "List categories", body = ApiResponse),
        (status = 400, description = "Invalid directives", body = FieldErrors),
    ),
    tag = "Categorys"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(CategoryService.list(&state, &ctx).await?))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID"), DirectiveQuery),
    responses(
        (status = 200, description = "Get category", body = ApiResponse),
        (status = 404, description = "Category not found", body = FieldErrors),
    ),
    tag = "Categorys"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(CategoryService.get(&state, &ctx, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    params(DirectiveQuery),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Create category", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
    ),
    tag = "Categorys"
)]
pub async fn create_category(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(CategoryService.create(&state, &ctx, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID"), DirectiveQuery),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Update category", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
        (status = 404, description = "Category not found", body = FieldErrors),
    ),
    tag = "Categorys"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(CategoryService.update(&state, &ctx, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 400, description = "Still in use", body = FieldErrors),
        (status = 404, description = "Category not found", body = FieldErrors),
    ),
    tag = "Categorys"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    Ok(Json(CategoryService.delete(&state, id).await?))
}
