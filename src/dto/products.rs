use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductPayload {
    /// Minor currency units.
    pub price: Option<i64>,
    pub discount: Option<i32>,
    pub quantity: Option<i32>,
    pub product_type: Option<Uuid>,
    /// The chosen variant, at most one value per feature type.
    pub feature_values: Option<Vec<Uuid>>,
    /// Ordered images: base64 data URIs or references the product already has.
    pub images: Option<Vec<String>>,
}
