use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::guard;
use crate::catalog::intl::TextField;
use crate::catalog::model::{Category, EntityKind, Id, Relation};
use crate::dto::FormCheck;
use crate::dto::categories::CategoryPayload;
use crate::error::AppResult;
use crate::repository::{self, SaveMode, begin_write, load_catalog};
use crate::response::ApiResponse;
use crate::state::AppState;

use super::{
    CatalogResource, Creatable, Deletable, Paginatable, Readable, RequestContext, Updatable,
    render, resolve_ids,
};

const FEATURE_TYPES_FIELD: &str = "feature_types";

pub struct CategoryService;

impl CatalogResource for CategoryService {
    type Entity = Category;
}

impl Readable for CategoryService {}

impl Paginatable for CategoryService {}

impl Deletable for CategoryService {}

#[async_trait]
impl Creatable for CategoryService {
    type Payload = CategoryPayload;

    async fn create(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        payload: CategoryPayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<Category>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;

        let mut form = FormCheck::new(&graph, &state.settings, true);
        let name = form.text(TextField::Name, payload.name, true);
        if let Some(name) = &name {
            form.check(guard::ensure_unique_text(
                &graph,
                EntityKind::Category,
                TextField::Name,
                name,
                None,
            ))?;
        }
        let feature_types = form.check(resolve_ids(
            &graph,
            EntityKind::FeatureType,
            &payload.feature_types.unwrap_or_default(),
            FEATURE_TYPES_FIELD,
        ))?;
        let (name, feature_types) = form.finish(name.zip(feature_types))?;

        let id = Uuid::now_v7();
        graph.insert(Category { id });
        graph.set_text(EntityKind::Category, id, TextField::Name, &name);
        graph.set_members(Relation::CategoryFeatureTypes, id, &feature_types)?;

        repository::save(&txn, &graph, EntityKind::Category, id, SaveMode::Insert).await?;
        txn.commit().await?;

        tracing::info!(category_id = %id, feature_types = feature_types.len(), "category created");
        render(state, ctx, &graph, graph.get::<Category>(&id)?)
    }
}

#[async_trait]
impl Updatable for CategoryService {
    type Payload = CategoryPayload;

    async fn update(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        id: Id,
        payload: CategoryPayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<Category>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;
        graph.get::<Category>(&id)?;

        let mut form = FormCheck::new(&graph, &state.settings, false);
        let name = form.text(TextField::Name, payload.name, true);
        if let Some(name) = &name {
            form.check(guard::ensure_unique_text(
                &graph,
                EntityKind::Category,
                TextField::Name,
                name,
                Some(id),
            ))?;
        }
        let feature_types = match payload.feature_types {
            Some(ids) => {
                let resolved = form.check(resolve_ids(
                    &graph,
                    EntityKind::FeatureType,
                    &ids,
                    FEATURE_TYPES_FIELD,
                ))?;
                match resolved {
                    Some(resolved) => form
                        .check(guard::ensure_category_scope_kept(&graph, id, &resolved))?
                        .map(|_| resolved),
                    None => None,
                }
            }
            None => None,
        };
        form.finish(Some(()))?;

        if let Some(name) = &name {
            graph.set_text(EntityKind::Category, id, TextField::Name, name);
        }
        if let Some(feature_types) = &feature_types {
            graph.set_members(Relation::CategoryFeatureTypes, id, feature_types)?;
        }

        repository::save(&txn, &graph, EntityKind::Category, id, SaveMode::Update).await?;
        txn.commit().await?;

        tracing::info!(category_id = %id, "category updated");
        render(state, ctx, &graph, graph.get::<Category>(&id)?)
    }
}
