use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::intl::LocalizedText;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CategoryPayload {
    /// Language code to name, e.g. `{"en": "Phone"}`.
    #[schema(value_type = Option<Object>)]
    pub name: Option<LocalizedText>,
    /// Feature types products of this category may vary by.
    pub feature_types: Option<Vec<Uuid>>,
}
