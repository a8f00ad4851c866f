use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::intl::LocalizedText;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductTypePayload {
    #[schema(value_type = Option<Object>)]
    pub name: Option<LocalizedText>,
    #[schema(value_type = Option<Object>)]
    pub description: Option<LocalizedText>,
    #[schema(value_type = Option<Object>)]
    pub short_description: Option<LocalizedText>,
    pub category: Option<Uuid>,
    /// Values products of this type may choose from.
    pub feature_values: Option<Vec<Uuid>>,
    /// Base64 data URI, or the current image reference to keep it. An empty
    /// string removes the image.
    pub image: Option<String>,
}
