//! Per-resource catalog services.
//!
//! Every resource is a unit struct composed from the capability traits it
//! supports. Reads load a snapshot and project it; writes run their checks,
//! mutate the snapshot and persist it inside one transaction.

use async_trait::async_trait;
use serde_json::json;

use crate::catalog::graph::{CatalogEntity, CatalogGraph};
use crate::catalog::guard;
use crate::catalog::model::{EntityKind, Id};
use crate::error::{AppError, AppResult};
use crate::projection::serializer::{self, project, project_list};
use crate::projection::{Directives, Projectable, ProjectionContext};
use crate::repository::{self, begin_read, begin_write, load_catalog};
use crate::response::ApiResponse;
use crate::state::AppState;

pub mod category_service;
pub mod feature_type_service;
pub mod feature_value_service;
pub mod language_service;
pub mod product_service;
pub mod product_type_service;
pub mod promo_code_service;

pub use category_service::CategoryService;
pub use feature_type_service::FeatureTypeService;
pub use feature_value_service::FeatureValueService;
pub use language_service::LanguageService;
pub use product_service::ProductService;
pub use product_type_service::ProductTypeService;
pub use promo_code_service::PromoCodeService;

/// What a request brings besides its payload.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub language: String,
    pub directives: Directives,
}

impl RequestContext {
    pub fn new(language: impl Into<String>, directives: Directives) -> Self {
        Self {
            language: language.into(),
            directives,
        }
    }

    pub fn projection<'a>(&'a self, graph: &'a CatalogGraph, state: &'a AppState) -> ProjectionContext<'a> {
        ProjectionContext::new(
            graph,
            &self.language,
            state.settings.fallback_language.as_deref(),
        )
    }

    /// Writes check their directives before touching storage so a bad query
    /// string cannot follow a committed change.
    pub fn validate_for<E: Projectable>(&self) -> AppResult<()> {
        serializer::validate::<E>(&self.directives)
    }
}

/// Projects one record with the request's directives.
pub fn render<E: Projectable>(
    state: &AppState,
    ctx: &RequestContext,
    graph: &CatalogGraph,
    entity: &E,
) -> AppResult<ApiResponse> {
    let data = project(entity, &ctx.projection(graph, state), &ctx.directives)?;
    Ok(ApiResponse::success(data, None))
}

/// Resolves referenced ids of `kind`, keeping input order and dropping
/// repeats. A missing id is reported on `field`.
pub fn resolve_ids(
    graph: &CatalogGraph,
    kind: EntityKind,
    ids: &[Id],
    field: &'static str,
) -> AppResult<Vec<Id>> {
    let mut resolved: Vec<Id> = Vec::with_capacity(ids.len());
    for &id in ids {
        if !graph.exists(kind, id) {
            return Err(AppError::not_found(kind, id).in_field(field));
        }
        if !resolved.contains(&id) {
            resolved.push(id);
        }
    }
    Ok(resolved)
}

/// A service exposing one catalog entity kind.
pub trait CatalogResource: Send + Sync {
    type Entity: Projectable + CatalogEntity;
}

#[async_trait]
pub trait Readable: CatalogResource {
    async fn get(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        key: <Self::Entity as CatalogEntity>::Key,
    ) -> AppResult<ApiResponse> {
        let txn = begin_read(&state.orm).await?;
        let graph = load_catalog(&txn).await?;
        txn.commit().await?;
        let entity = graph.get::<Self::Entity>(&key)?;
        render(state, ctx, &graph, entity)
    }
}

#[async_trait]
pub trait Paginatable: CatalogResource {
    async fn list(&self, state: &AppState, ctx: &RequestContext) -> AppResult<ApiResponse> {
        let txn = begin_read(&state.orm).await?;
        let graph = load_catalog(&txn).await?;
        txn.commit().await?;
        let (data, meta) = project_list(
            graph.list::<Self::Entity>(),
            &ctx.projection(&graph, state),
            &ctx.directives,
            &state.settings,
        )?;
        Ok(ApiResponse::success(data, meta))
    }
}

#[async_trait]
pub trait Creatable: CatalogResource {
    type Payload: Send + 'static;

    async fn create(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        payload: Self::Payload,
    ) -> AppResult<ApiResponse>;
}

/// Partial update: absent payload fields keep their stored value.
#[async_trait]
pub trait Updatable: CatalogResource {
    type Payload: Send + 'static;

    async fn update(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        id: Id,
        payload: Self::Payload,
    ) -> AppResult<ApiResponse>;
}

#[async_trait]
pub trait Deletable: CatalogResource<Entity: CatalogEntity<Key = Id>> {
    async fn delete(&self, state: &AppState, id: Id) -> AppResult<ApiResponse> {
        let kind = <Self::Entity as CatalogEntity>::KIND;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;
        graph.get::<Self::Entity>(&id)?;
        repository::load_dependents(&txn, &mut graph, kind, id).await?;
        guard::ensure_deletable(&graph, kind, id)?;

        repository::delete_entity(&txn, kind, id).await?;
        txn.commit().await?;

        tracing::info!(kind = %kind, id = %id, "catalog record deleted");
        Ok(ApiResponse::success(json!({ "id": id }), None))
    }
}
