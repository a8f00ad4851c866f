use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl Meta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self { page, limit, total }
    }
}

/// Success body. `data` is whatever the projection produced, so it is typed
/// loosely here and described per route in the docs.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse {
    #[schema(value_type = Object)]
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl ApiResponse {
    pub fn success(data: Value, meta: Option<Meta>) -> Self {
        Self { data, meta }
    }
}
