use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::guard;
use crate::catalog::intl::TextField;
use crate::catalog::model::{EntityKind, FeatureType, FeatureValue, Id};
use crate::dto::FormCheck;
use crate::dto::feature_values::FeatureValuePayload;
use crate::error::AppResult;
use crate::repository::{self, SaveMode, begin_write, load_catalog};
use crate::response::ApiResponse;
use crate::state::AppState;

use super::{
    CatalogResource, Creatable, Deletable, Paginatable, Readable, RequestContext, Updatable, render,
};

const FEATURE_TYPE_FIELD: &str = "feature_type";

pub struct FeatureValueService;

impl CatalogResource for FeatureValueService {
    type Entity = FeatureValue;
}

impl Readable for FeatureValueService {}

impl Paginatable for FeatureValueService {}

impl Deletable for FeatureValueService {}

#[async_trait]
impl Creatable for FeatureValueService {
    type Payload = FeatureValuePayload;

    async fn create(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        payload: FeatureValuePayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<FeatureValue>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;

        let mut form = FormCheck::new(&graph, &state.settings, true);
        let name = form.text(TextField::Name, payload.name, true);
        let feature_type = match form.require(FEATURE_TYPE_FIELD, payload.feature_type) {
            Some(feature_type) => form.check(
                graph
                    .get::<FeatureType>(&feature_type)
                    .map(|feature_type| feature_type.id)
                    .map_err(|err| err.in_field(FEATURE_TYPE_FIELD)),
            )?,
            None => None,
        };
        let (name, feature_type) = form.finish(name.zip(feature_type))?;

        let id = Uuid::now_v7();
        graph.insert(FeatureValue { id, feature_type });
        graph.set_text(EntityKind::FeatureValue, id, TextField::Name, &name);

        repository::save(&txn, &graph, EntityKind::FeatureValue, id, SaveMode::Insert).await?;
        txn.commit().await?;

        tracing::info!(feature_value_id = %id, feature_type_id = %feature_type, "feature value created");
        render(state, ctx, &graph, graph.get::<FeatureValue>(&id)?)
    }
}

#[async_trait]
impl Updatable for FeatureValueService {
    type Payload = FeatureValuePayload;

    async fn update(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        id: Id,
        payload: FeatureValuePayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<FeatureValue>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;
        let current = graph.get::<FeatureValue>(&id)?.feature_type;

        let mut form = FormCheck::new(&graph, &state.settings, false);
        let name = form.text(TextField::Name, payload.name, true);
        let feature_type = match payload.feature_type {
            Some(feature_type) if feature_type != current => {
                let exists = form.check(
                    graph
                        .get::<FeatureType>(&feature_type)
                        .map(|_| ())
                        .map_err(|err| err.in_field(FEATURE_TYPE_FIELD)),
                )?;
                let movable = form.check(guard::ensure_value_unreferenced(&graph, id))?;
                exists.and(movable).map(|_| feature_type)
            }
            _ => None,
        };
        form.finish(Some(()))?;

        if let Some(name) = &name {
            graph.set_text(EntityKind::FeatureValue, id, TextField::Name, name);
        }
        if let Some(feature_type) = feature_type {
            graph.get_mut::<FeatureValue>(&id)?.feature_type = feature_type;
        }

        repository::save(&txn, &graph, EntityKind::FeatureValue, id, SaveMode::Update).await?;
        txn.commit().await?;

        tracing::info!(feature_value_id = %id, "feature value updated");
        render(state, ctx, &graph, graph.get::<FeatureValue>(&id)?)
    }
}
