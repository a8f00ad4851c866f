use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::feature_values::FeatureValuePayload,
    error::{AppResult, FieldErrors},
    middleware::language::RequestLanguage,
    projection::DirectiveQuery,
    response::ApiResponse,
    routes::params::request_context,
    services::{Creatable, Deletable, FeatureValueService, Paginatable, Readable, Updatable},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feature_values).post(create_feature_value))
        .route(
            "/{id}",
            get(get_feature_value).put(update_feature_value).delete(delete_feature_value),
        )
}

#[utoipa::path(
    get,
    path = "/api/feature_values",
    params(DirectiveQuery),
    responses(
        (status = 200, description = "List feature values", body = ApiResponse),
        (status = 400, description = "Invalid directives", body = FieldErrors),
    ),
    tag = "Feature values"
)]
pub async fn list_feature_values(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(FeatureValueService.list(&state, &ctx).await?))
}

#[utoipa::path(
    get,
    path = "/api/feature_values/{id}",
    params(("id" = Uuid, Path, description = "Feature value ID"), DirectiveQuery),
    responses(
        (status = 200, description = "Get feature value", body = ApiResponse),
        (status = 404, description = "Feature value not found", body = FieldErrors),
    ),
    tag = "Feature values"
)]
pub async fn get_feature_value(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(FeatureValueService.get(&state, &ctx, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/feature_values",
    params(DirectiveQuery),
    request_body = FeatureValuePayload,
    responses(
        (status = 200, description = "Create feature value", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
    ),
    tag = "Feature values"
)]
pub async fn create_feature_value(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<FeatureValuePayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(FeatureValueService.create(&state, &ctx, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/feature_values/{id}",
    params(("id" = Uuid, Path, description = "Feature value ID"), DirectiveQuery),
    request_body = FeatureValuePayload,
    responses(
        (status = 200, description = "Update feature value", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
        (status = 404, description = "Feature value not found", body = FieldErrors),
    ),
    tag = "Feature values"
)]
pub async fn update_feature_value(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<FeatureValuePayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(FeatureValueService.update(&state, &ctx, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/feature_values/{id}",
    params(("id" = Uuid, Path, description = "Feature value ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 400, description = "Still in use", body = FieldErrors),
        (status = 404, description = "Feature value not found", body = FieldErrors),
    ),
    tag = "Feature values"
)]
pub async fn delete_feature_value(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    Ok(Json(FeatureValueService.delete(&state, id).await?))
}
