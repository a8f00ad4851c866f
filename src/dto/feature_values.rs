use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::intl::LocalizedText;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FeatureValuePayload {
    #[schema(value_type = Option<Object>)]
    pub name: Option<LocalizedText>,
    pub feature_type: Option<Uuid>,
}
