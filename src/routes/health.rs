use axum::Json;
use serde_json::json;

use crate::response::ApiResponse;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse),
    ),
        tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse::success(json!({ "status": "ok" }), None))
}
