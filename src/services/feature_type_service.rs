use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::guard;
use crate::catalog::intl::TextField;
use crate::catalog::model::{EntityKind, FeatureType, Id};
use crate::dto::FormCheck;
use crate::dto::feature_types::FeatureTypePayload;
use crate::error::AppResult;
use crate::repository::{self, SaveMode, begin_write, load_catalog};
use crate::response::ApiResponse;
use crate::state::AppState;

use super::{
    CatalogResource, Creatable, Deletable, Paginatable, Readable, RequestContext, Updatable, render,
};

pub struct FeatureTypeService;

impl CatalogResource for FeatureTypeService {
    type Entity = FeatureType;
}

impl Readable for FeatureTypeService {}

impl Paginatable for FeatureTypeService {}

impl Deletable for FeatureTypeService {}

#[async_trait]
impl Creatable for FeatureTypeService {
    type Payload = FeatureTypePayload;

    async fn create(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        payload: FeatureTypePayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<FeatureType>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;

        let mut form = FormCheck::new(&graph, &state.settings, true);
        let name = form.text(TextField::Name, payload.name, true);
        if let Some(name) = &name {
            form.check(guard::ensure_unique_text(
                &graph,
                EntityKind::FeatureType,
                TextField::Name,
                name,
                None,
            ))?;
        }
        let name = form.finish(name)?;

        let id = Uuid::now_v7();
        graph.insert(FeatureType { id });
        graph.set_text(EntityKind::FeatureType, id, TextField::Name, &name);

        repository::save(&txn, &graph, EntityKind::FeatureType, id, SaveMode::Insert).await?;
        txn.commit().await?;

        tracing::info!(feature_type_id = %id, "feature type created");
        render(state, ctx, &graph, graph.get::<FeatureType>(&id)?)
    }
}

#[async_trait]
impl Updatable for FeatureTypeService {
    type Payload = FeatureTypePayload;

    async fn update(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        id: Id,
        payload: FeatureTypePayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<FeatureType>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;
        graph.get::<FeatureType>(&id)?;

        let mut form = FormCheck::new(&graph, &state.settings, false);
        let name = form.text(TextField::Name, payload.name, true);
        if let Some(name) = &name {
            form.check(guard::ensure_unique_text(
                &graph,
                EntityKind::FeatureType,
                TextField::Name,
                name,
                Some(id),
            ))?;
        }
        form.finish(Some(()))?;

        if let Some(name) = &name {
            graph.set_text(EntityKind::FeatureType, id, TextField::Name, name);
        }

        repository::save(&txn, &graph, EntityKind::FeatureType, id, SaveMode::Update).await?;
        txn.commit().await?;

        tracing::info!(feature_type_id = %id, "feature type updated");
        render(state, ctx, &graph, graph.get::<FeatureType>(&id)?)
    }
}
