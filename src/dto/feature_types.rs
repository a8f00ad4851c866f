use serde::Deserialize;
use utoipa::ToSchema;

use crate::catalog::intl::LocalizedText;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FeatureTypePayload {
    #[schema(value_type = Option<Object>)]
    pub name: Option<LocalizedText>,
}
