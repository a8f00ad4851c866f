use async_trait::async_trait;
use uuid::Uuid;

use crate::assets::{AssetStore, PreparedAsset};
use crate::catalog::graph::CatalogGraph;
use crate::catalog::model::{EntityKind, Id, Product, ProductType, Relation};
use crate::catalog::variants::{AllowedSet, check_product_variant};
use crate::dto::FormCheck;
use crate::dto::products::ProductPayload;
use crate::error::AppResult;
use crate::repository::{self, SaveMode, begin_write, load_catalog};
use crate::response::ApiResponse;
use crate::state::AppState;

use super::{
    CatalogResource, Creatable, Deletable, Paginatable, Readable, RequestContext, Updatable, render,
};

const PRODUCT_TYPE_FIELD: &str = "product_type";
const IMAGES_FIELD: &str = "images";

pub struct ProductService;

impl CatalogResource for ProductService {
    type Entity = Product;
}

impl Readable for ProductService {}

impl Paginatable for ProductService {}

impl Deletable for ProductService {}

fn resolve_product_type(graph: &CatalogGraph, product_type: Id) -> AppResult<Id> {
    graph
        .get::<ProductType>(&product_type)
        .map(|product_type| product_type.id)
        .map_err(|err| err.in_field(PRODUCT_TYPE_FIELD))
}

fn variant(graph: &CatalogGraph, product_type: Id, candidates: &[Id]) -> AppResult<Vec<Id>> {
    let allowed = AllowedSet::for_product_type(graph, product_type)?;
    check_product_variant(graph, &allowed, candidates)
}

fn prepare_images(
    assets: &dyn AssetStore,
    raw: &[String],
    existing: &[String],
) -> AppResult<Vec<PreparedAsset>> {
    raw.iter()
        .map(|raw| assets.prepare(raw, existing, IMAGES_FIELD))
        .collect()
}

#[async_trait]
impl Creatable for ProductService {
    type Payload = ProductPayload;

    async fn create(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        payload: ProductPayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<Product>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;

        let mut form = FormCheck::new(&graph, &state.settings, true);
        let price = form.non_negative("price", payload.price);
        let discount = form.non_negative("discount", payload.discount);
        let quantity = form.non_negative("quantity", payload.quantity);
        let product_type = match form.require(PRODUCT_TYPE_FIELD, payload.product_type) {
            Some(product_type) => form.check(resolve_product_type(&graph, product_type))?,
            None => None,
        };
        let feature_values = match product_type {
            Some(product_type) => form.check(variant(
                &graph,
                product_type,
                &payload.feature_values.unwrap_or_default(),
            ))?,
            None => None,
        };
        let images = form.check(prepare_images(
            state.assets.as_ref(),
            &payload.images.unwrap_or_default(),
            &[],
        ))?;
        let ((((price, discount), quantity), (product_type, feature_values)), images) = form
            .finish(
                price
                    .zip(discount)
                    .zip(quantity)
                    .zip(product_type.zip(feature_values))
                    .zip(images),
            )?;

        let id = Uuid::now_v7();
        graph.insert(Product {
            id,
            price,
            discount,
            quantity,
            product_type,
            images: images.iter().map(|asset| asset.reference.clone()).collect(),
        });
        graph.set_members(Relation::ProductFeatureValues, id, &feature_values)?;

        repository::save(&txn, &graph, EntityKind::Product, id, SaveMode::Insert).await?;
        state.assets.persist(&images).await?;
        txn.commit().await?;

        tracing::info!(product_id = %id, product_type_id = %product_type, "product created");
        render(state, ctx, &graph, graph.get::<Product>(&id)?)
    }
}

#[async_trait]
impl Updatable for ProductService {
    type Payload = ProductPayload;

    async fn update(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        id: Id,
        payload: ProductPayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<Product>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;
        let current = graph.get::<Product>(&id)?.clone();

        let mut form = FormCheck::new(&graph, &state.settings, false);
        let price = form.non_negative("price", payload.price);
        let discount = form.non_negative("discount", payload.discount);
        let quantity = form.non_negative("quantity", payload.quantity);
        let product_type = match payload.product_type {
            Some(product_type) => form.check(resolve_product_type(&graph, product_type))?,
            None => Some(current.product_type),
        };

        let touches_variant = payload
            .product_type
            .is_some_and(|product_type| product_type != current.product_type)
            || payload.feature_values.is_some();
        let feature_values = match (product_type, touches_variant) {
            (Some(product_type), true) => {
                let candidates = payload.feature_values.clone().unwrap_or_else(|| {
                    graph.members_of(Relation::ProductFeatureValues, id)
                });
                form.check(variant(&graph, product_type, &candidates))?
            }
            _ => None,
        };
        let images = match &payload.images {
            Some(raw) => form
                .check(prepare_images(state.assets.as_ref(), raw, &current.images))?
                .map(Some),
            None => Some(None),
        };
        let (product_type, images) = form.finish(product_type.zip(images))?;

        if let Some(values) = &feature_values {
            graph.set_members(Relation::ProductFeatureValues, id, values)?;
        }
        {
            let product = graph.get_mut::<Product>(&id)?;
            product.product_type = product_type;
            if let Some(price) = price {
                product.price = price;
            }
            if let Some(discount) = discount {
                product.discount = discount;
            }
            if let Some(quantity) = quantity {
                product.quantity = quantity;
            }
            if let Some(images) = &images {
                product.images = images.iter().map(|asset| asset.reference.clone()).collect();
            }
        }

        repository::save(&txn, &graph, EntityKind::Product, id, SaveMode::Update).await?;
        state.assets.persist(&images.unwrap_or_default()).await?;
        txn.commit().await?;

        tracing::info!(product_id = %id, "product updated");
        render(state, ctx, &graph, graph.get::<Product>(&id)?)
    }
}
