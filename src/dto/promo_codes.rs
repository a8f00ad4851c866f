use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PromoCodePayload {
    /// Stored lowercased; must be unique.
    pub value: Option<String>,
    pub discount: Option<i32>,
    pub is_active: Option<bool>,
    pub disable_on_use: Option<bool>,
    pub products: Option<Vec<Uuid>>,
}
