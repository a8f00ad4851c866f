use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::assets::AssetStore;
use crate::config::CatalogSettings;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub settings: Arc<CatalogSettings>,
    pub assets: Arc<dyn AssetStore>,
}

impl AppState {
    pub fn new(
        orm: DatabaseConnection,
        settings: CatalogSettings,
        assets: impl AssetStore + 'static,
    ) -> Self {
        Self {
            orm,
            settings: Arc::new(settings),
            assets: Arc::new(assets),
        }
    }
}
