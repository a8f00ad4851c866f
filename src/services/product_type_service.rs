use async_trait::async_trait;
use uuid::Uuid;

use crate::assets::PreparedAsset;
use crate::catalog::graph::CatalogGraph;
use crate::catalog::guard;
use crate::catalog::intl::{LocalizedText, TextField};
use crate::catalog::model::{Category, EntityKind, Id, ProductType, Relation};
use crate::catalog::variants::{AllowedSet, check_category_scope};
use crate::dto::FormCheck;
use crate::dto::product_types::ProductTypePayload;
use crate::error::AppResult;
use crate::repository::{self, SaveMode, begin_write, load_catalog};
use crate::response::ApiResponse;
use crate::state::AppState;

use super::{
    CatalogResource, Creatable, Deletable, Paginatable, Readable, RequestContext, Updatable, render,
};

const CATEGORY_FIELD: &str = "category";
const IMAGE_FIELD: &str = "image";

pub struct ProductTypeService;

impl CatalogResource for ProductTypeService {
    type Entity = ProductType;
}

impl Readable for ProductTypeService {}

impl Paginatable for ProductTypeService {}

impl Deletable for ProductTypeService {}

/// Localized fields of a product type that passed their form rules.
struct Texts {
    name: Option<LocalizedText>,
    description: Option<LocalizedText>,
    short_description: Option<LocalizedText>,
}

impl Texts {
    fn check(
        form: &mut FormCheck<'_>,
        graph: &CatalogGraph,
        payload: &mut ProductTypePayload,
        current: Option<Id>,
    ) -> AppResult<Self> {
        let name = form.text(TextField::Name, payload.name.take(), true);
        if let Some(name) = &name {
            form.check(guard::ensure_unique_text(
                graph,
                EntityKind::ProductType,
                TextField::Name,
                name,
                current,
            ))?;
        }
        Ok(Self {
            name,
            description: form.text(TextField::Description, payload.description.take(), false),
            short_description: form.text(
                TextField::ShortDescription,
                payload.short_description.take(),
                false,
            ),
        })
    }

    fn apply(&self, graph: &mut CatalogGraph, id: Id) {
        for (field, text) in [
            (TextField::Name, &self.name),
            (TextField::Description, &self.description),
            (TextField::ShortDescription, &self.short_description),
        ] {
            if let Some(text) = text {
                graph.set_text(EntityKind::ProductType, id, field, text);
            }
        }
    }
}

fn resolve_category(graph: &CatalogGraph, category: Id) -> AppResult<Id> {
    graph
        .get::<Category>(&category)
        .map(|category| category.id)
        .map_err(|err| err.in_field(CATEGORY_FIELD))
}

fn scoped_values(graph: &CatalogGraph, category: Id, candidates: &[Id]) -> AppResult<Vec<Id>> {
    let allowed = AllowedSet::for_category(graph, category)?;
    check_category_scope(graph, &allowed, candidates)
}

#[async_trait]
impl Creatable for ProductTypeService {
    type Payload = ProductTypePayload;

    async fn create(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        mut payload: ProductTypePayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<ProductType>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;

        let mut form = FormCheck::new(&graph, &state.settings, true);
        let texts = Texts::check(&mut form, &graph, &mut payload, None)?;
        let category = match form.require(CATEGORY_FIELD, payload.category) {
            Some(category) => form.check(resolve_category(&graph, category))?,
            None => None,
        };
        let feature_values = match category {
            Some(category) => form.check(scoped_values(
                &graph,
                category,
                &payload.feature_values.unwrap_or_default(),
            ))?,
            None => None,
        };
        let image = match payload.image.as_deref().filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => form
                .check(state.assets.prepare(raw, &[], IMAGE_FIELD))?
                .map(Some),
            None => Some(None),
        };
        let ((category, feature_values), image) =
            form.finish(category.zip(feature_values).zip(image))?;

        let id = Uuid::now_v7();
        graph.insert(ProductType {
            id,
            category,
            image: image.as_ref().map(|asset| asset.reference.clone()),
        });
        texts.apply(&mut graph, id);
        graph.set_members(Relation::ProductTypeFeatureValues, id, &feature_values)?;

        repository::save(&txn, &graph, EntityKind::ProductType, id, SaveMode::Insert).await?;
        let assets: Vec<PreparedAsset> = image.into_iter().collect();
        state.assets.persist(&assets).await?;
        txn.commit().await?;

        tracing::info!(
            product_type_id = %id,
            category_id = %category,
            feature_values = feature_values.len(),
            "product type created"
        );
        render(state, ctx, &graph, graph.get::<ProductType>(&id)?)
    }
}

#[async_trait]
impl Updatable for ProductTypeService {
    type Payload = ProductTypePayload;

    async fn update(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        id: Id,
        mut payload: ProductTypePayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<ProductType>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;
        let current = graph.get::<ProductType>(&id)?.clone();

        let mut form = FormCheck::new(&graph, &state.settings, false);
        let texts = Texts::check(&mut form, &graph, &mut payload, Some(id))?;
        let category = match payload.category {
            Some(category) => form.check(resolve_category(&graph, category))?,
            None => Some(current.category),
        };

        // Moving category or changing the allowed values re-checks both the
        // scope and the products already built on the old values.
        let touches_variants =
            payload.category.is_some_and(|category| category != current.category)
                || payload.feature_values.is_some();
        let feature_values = match (category, touches_variants) {
            (Some(category), true) => {
                let candidates = payload.feature_values.take().unwrap_or_else(|| {
                    graph.members_of(Relation::ProductTypeFeatureValues, id)
                });
                match form.check(scoped_values(&graph, category, &candidates))? {
                    Some(values) => form
                        .check(guard::ensure_variants_kept(&graph, id, &values))?
                        .map(|_| values),
                    None => None,
                }
            }
            _ => None,
        };

        let existing: Vec<String> = current.image.iter().cloned().collect();
        let image = match payload.image.as_deref().map(str::trim) {
            None => Some(current.image.clone().map(|reference| (reference, None))),
            Some("") => Some(None),
            Some(raw) => form
                .check(state.assets.prepare(raw, &existing, IMAGE_FIELD))?
                .map(|asset| Some((asset.reference.clone(), Some(asset)))),
        };
        let (category, image) = form.finish(category.zip(image))?;

        texts.apply(&mut graph, id);
        if let Some(values) = &feature_values {
            graph.set_members(Relation::ProductTypeFeatureValues, id, values)?;
        }
        let (reference, asset) = match image {
            Some((reference, asset)) => (Some(reference), asset),
            None => (None, None),
        };
        {
            let product_type = graph.get_mut::<ProductType>(&id)?;
            product_type.category = category;
            product_type.image = reference;
        }

        repository::save(&txn, &graph, EntityKind::ProductType, id, SaveMode::Update).await?;
        let assets: Vec<PreparedAsset> = asset.into_iter().collect();
        state.assets.persist(&assets).await?;
        txn.commit().await?;

        tracing::info!(product_type_id = %id, "product type updated");
        render(state, ctx, &graph, graph.get::<ProductType>(&id)?)
    }
}
