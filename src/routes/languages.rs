use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    error::{AppResult, FieldErrors},
    middleware::language::RequestLanguage,
    projection::DirectiveQuery,
    response::ApiResponse,
    routes::params::request_context,
    services::{LanguageService, Paginatable, Readable},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_languages))
        .route("/{code}", get(get_language))
}

#[utoipa::path(
    get,
    path = "/api/languages",
    params(DirectiveQuery),
    responses(
        (status = 200, description = "List languages", body = ApiResponse),
        (status = 400, description = "Invalid directives", body = FieldErrors),
    ),
    tag = "Languages"
)]
pub async fn list_languages(
    State(state): State<AppState>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(LanguageService.list(&state, &ctx).await?))
}

#[utoipa::path(
    get,
    path = "/api/languages/{code}",
    params(("code" = String, Path, description = "Language code, e.g. `en`"), DirectiveQuery),
    responses(
        (status = 200, description = "Get language", body = ApiResponse),
        (status = 404, description = "Language not found", body = FieldErrors),
    ),
    tag = "Languages"
)]
pub async fn get_language(
    State(state): State<AppState>,
    Path(code): Path<String>,
    language: RequestLanguage,
    Query(query): Query<DirectiveQuery>,
) -> AppResult<Json<ApiResponse>> {
    let ctx = request_context(language, &query)?;
    Ok(Json(LanguageService.get(&state, &ctx, code).await?))
}
