use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::guard;
use crate::catalog::model::{EntityKind, Id, PromoCode, Relation};
use crate::dto::promo_codes::PromoCodePayload;
use crate::dto::{FormCheck, PROMO_CODE_MAX_LENGTH};
use crate::error::AppResult;
use crate::repository::{self, SaveMode, begin_write, load_catalog};
use crate::response::ApiResponse;
use crate::state::AppState;

use super::{
    CatalogResource, Creatable, Deletable, Paginatable, Readable, RequestContext, Updatable,
    render, resolve_ids,
};

const VALUE_FIELD: &str = "value";
const PRODUCTS_FIELD: &str = "products";

pub struct PromoCodeService;

impl CatalogResource for PromoCodeService {
    type Entity = PromoCode;
}

impl Readable for PromoCodeService {}

impl Paginatable for PromoCodeService {}

impl Deletable for PromoCodeService {}

#[async_trait]
impl Creatable for PromoCodeService {
    type Payload = PromoCodePayload;

    async fn create(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        payload: PromoCodePayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<PromoCode>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;

        let mut form = FormCheck::new(&graph, &state.settings, true);
        let value = form
            .non_empty(VALUE_FIELD, payload.value, PROMO_CODE_MAX_LENGTH)
            .map(|value| value.to_lowercase());
        if let Some(value) = &value {
            form.check(guard::ensure_unique_promo_code(&graph, value, None))?;
        }
        let discount = form.non_negative("discount", payload.discount);
        let products = form.check(resolve_ids(
            &graph,
            EntityKind::Product,
            &payload.products.unwrap_or_default(),
            PRODUCTS_FIELD,
        ))?;
        let ((value, discount), products) = form.finish(value.zip(discount).zip(products))?;

        let id = Uuid::now_v7();
        graph.insert(PromoCode {
            id,
            value,
            discount,
            is_active: payload.is_active.unwrap_or(true),
            disable_on_use: payload.disable_on_use.unwrap_or(false),
        });
        graph.set_members(Relation::PromoCodeProducts, id, &products)?;

        repository::save(&txn, &graph, EntityKind::PromoCode, id, SaveMode::Insert).await?;
        txn.commit().await?;

        tracing::info!(promo_code_id = %id, products = products.len(), "promo code created");
        render(state, ctx, &graph, graph.get::<PromoCode>(&id)?)
    }
}

#[async_trait]
impl Updatable for PromoCodeService {
    type Payload = PromoCodePayload;

    async fn update(
        &self,
        state: &AppState,
        ctx: &RequestContext,
        id: Id,
        payload: PromoCodePayload,
    ) -> AppResult<ApiResponse> {
        ctx.validate_for::<PromoCode>()?;
        let txn = begin_write(&state.orm).await?;
        let mut graph = load_catalog(&txn).await?;
        graph.get::<PromoCode>(&id)?;

        let mut form = FormCheck::new(&graph, &state.settings, false);
        let value = form
            .non_empty(VALUE_FIELD, payload.value, PROMO_CODE_MAX_LENGTH)
            .map(|value| value.to_lowercase());
        if let Some(value) = &value {
            form.check(guard::ensure_unique_promo_code(&graph, value, Some(id)))?;
        }
        let discount = form.non_negative("discount", payload.discount);
        let products = match &payload.products {
            Some(ids) => form.check(resolve_ids(&graph, EntityKind::Product, ids, PRODUCTS_FIELD))?,
            None => None,
        };
        form.finish(Some(()))?;

        if let Some(products) = &products {
            graph.set_members(Relation::PromoCodeProducts, id, products)?;
        }
        {
            let code = graph.get_mut::<PromoCode>(&id)?;
            if let Some(value) = value {
                code.value = value;
            }
            if let Some(discount) = discount {
                code.discount = discount;
            }
            if let Some(is_active) = payload.is_active {
                code.is_active = is_active;
            }
            if let Some(disable_on_use) = payload.disable_on_use {
                code.disable_on_use = disable_on_use;
            }
        }

        repository::save(&txn, &graph, EntityKind::PromoCode, id, SaveMode::Update).await?;
        txn.commit().await?;

        tracing::info!(promo_code_id = %id, "promo code updated");
        render(state, ctx, &graph, graph.get::<PromoCode>(&id)?)
    }
}
