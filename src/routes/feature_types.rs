use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::feature_types::FeatureTypePayload,
    error::{AppResult, FieldErrors},
    middleware::language::RequestLanguage,
    projection::DirectiveQuery,
    response::ApiResponse,
    routes::params::request_context,
    services::{Creatable, Deletable, FeatureTypeService, Paginatable, Readable, Updatable},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feature_types).post(create_feature_type))
        .route(
            "/{id}",
            get(get_feature_type).put(update_feature_type).delete(delete_feature_type),
        )
}

#[utoipa::path(
    get,
    path = "/api/feature_types",
    params(DirectiveQuery),
    responses(
        (status = 200, description = "List feature types", body = ApiResponse),
        (status = 400, description = "Invalid directives", body = FieldErrors),
    ),
    tag = "Feature types"
)]
pub async fn list_feature_types(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(FeatureTypeService.list(&state, &ctx).await?))
}

#[utoipa::path(
    get,
    path = "/api/feature_types/{id}",
    params(("id" = Uuid, Path, description = "Feature type ID"), DirectiveQuery),
    responses(
        (status = 200, description = "Get feature type", body = ApiResponse),
        (status = 404, description = "Feature type not found", body = FieldErrors),
    ),
    tag = "Feature types"
)]
pub async fn get_feature_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(FeatureTypeService.get(&state, &ctx, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/feature_types",
    params(DirectiveQuery),
    request_body = FeatureTypePayload,
    responses(
        (status = 200, description = "Create feature type", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
    ),
    tag = "Feature types"
)]
pub async fn create_feature_type(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<FeatureTypePayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(FeatureTypeService.create(&state, &ctx, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/feature_types/{id}",
    params(("id" = Uuid, Path, description = "Feature type ID"), DirectiveQuery),
    request_body = FeatureTypePayload,
    responses(
        (status = 200, description = "Update feature type", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
        (status = 404, description = "Feature type not found", body = FieldErrors),
    ),
    tag = "Feature types"
)]
pub async fn update_feature_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<FeatureTypePayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(FeatureTypeService.update(&state, &ctx, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/feature_types/{id}",
    params(("id" = Uuid, Path, description = "Feature type ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 400, description = "Still in use", body = FieldErrors),
        (status = 404, description = "Feature type not found", body = FieldErrors),
    ),
    tag = "Feature types"
)]
pub async fn delete_feature_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    Ok(Json(FeatureTypeService.delete(&state, id).await?))
}
