use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::promo_codes::PromoCodePayload,
    error::{AppResult, FieldErrors},
    middleware::language::RequestLanguage,
    projection::DirectiveQuery,
    response::ApiResponse,
    routes::params::request_context,
    services::{Creatable, Deletable, Paginatable, PromoCodeService, Readable, Updatable},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_promo_codes).post(create_promo_code))
        .route(
            "/{id}",
            get(get_promo_code).put(update_promo_code).delete(delete_promo_code),
        )
}

#[utoipa::path(
    get,
    path = "/api/promo_codes",
    params(DirectiveQuery),
    responses(
        (status = 200, description = "List promo codes", body = ApiResponse),
        (status = 400, description = "Invalid directives", body = FieldErrors),
    ),
    tag = "Promo codes"
)]
pub async fn list_promo_codes(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(PromoCodeService.list(&state, &ctx).await?))
}

#[utoipa::path(
    get,
    path = "/api/promo_codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code ID"), DirectiveQuery),
    responses(
        (status = 200, description = "Get promo code", body = ApiResponse),
        (status = 404, description = "Promo code not found", body = FieldErrors),
    ),
    tag = "Promo codes"
)]
pub async fn get_promo_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(PromoCodeService.get(&state, &ctx, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/promo_codes",
    params(DirectiveQuery),
    request_body = PromoCodePayload,
    responses(
        (status = 200, description = "Create promo code", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
    ),
    tag = "Promo codes"
)]
pub async fn create_promo_code(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<PromoCodePayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(PromoCodeService.create(&state, &ctx, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/promo_codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code ID"), DirectiveQuery),
    request_body = PromoCodePayload,
    responses(
        (status = 200, description = "Update promo code", body = ApiResponse),
        (status = 400, description = "Field errors", body = FieldErrors),
        (status = 404, description = "Promo code not found", body = FieldErrors),
    ),
    tag = "Promo codes"
)]
pub async fn update_promo_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
    Json(payload): Json<PromoCodePayload>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(PromoCodeService.update(&state, &ctx, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/promo_codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 400, description = "Still in use", body = FieldErrors),
        (status = 404, description = "Promo code not found", body = FieldErrors),
    ),
    tag = "Promo codes"
)]
pub async fn delete_promo_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    Ok(Json(PromoCodeService.delete(&state, id).await?))
}
