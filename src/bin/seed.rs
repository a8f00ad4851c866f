use axum_catalog_api::{
    assets::LocalAssetStore,
    catalog::{LocalizedText, model::Category},
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        categories::CategoryPayload, feature_types::FeatureTypePayload,
        feature_values::FeatureValuePayload, product_types::ProductTypePayload,
        products::ProductPayload, promo_codes::PromoCodePayload,
    },
    projection::Directives,
    repository::load_catalog,
    response::ApiResponse,
    services::{
        CategoryService, Creatable, FeatureTypeService, FeatureValueService, ProductService,
        ProductTypeService, PromoCodeService, RequestContext,
    },
    state::AppState,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let assets = LocalAssetStore::new(&config.media_root, config.media_url.clone());
    let state = AppState::new(orm, config.catalog.clone(), assets);

    let graph = load_catalog(&state.orm).await?;
    if !graph.list::<Category>().is_empty() {
        println!("Catalog already has categories, nothing to seed");
        return Ok(());
    }

    let ctx = RequestContext::new(config.catalog.default_language.clone(), Directives::default());
    let phones = seed_phones(&state, &ctx).await?;

    println!("Seed completed. Phone product type ID: {phones}");
    Ok(())
}

fn text(en: &str, ru: &str) -> Option<LocalizedText> {
    Some([("en", en), ("ru", ru)].into_iter().collect())
}

fn created_id(response: &ApiResponse) -> anyhow::Result<Uuid> {
    let id = response
        .data
        .get("id")
        .and_then(|id| id.as_str())
        .ok_or_else(|| anyhow::anyhow!("created record has no id"))?;
    Ok(id.parse()?)
}

async fn feature_type(
    state: &AppState,
    ctx: &RequestContext,
    name: Option<LocalizedText>,
    values: &[(&str, &str)],
) -> anyhow::Result<(Uuid, Vec<Uuid>)> {
    let created = FeatureTypeService
        .create(state, ctx, FeatureTypePayload { name })
        .await?;
    let feature_type = created_id(&created)?;

    let mut ids = Vec::with_capacity(values.len());
    for (en, ru) in values {
        let payload = FeatureValuePayload {
            name: text(en, ru),
            feature_type: Some(feature_type),
        };
        let created = FeatureValueService.create(state, ctx, payload).await?;
        ids.push(created_id(&created)?);
    }
    Ok((feature_type, ids))
}

async fn seed_phones(state: &AppState, ctx: &RequestContext) -> anyhow::Result<Uuid> {
    let (ram, ram_values) =
        feature_type(state, ctx, text("RAM", "Память"), &[("4 GB", "4 ГБ"), ("8 GB", "8 ГБ")]).await?;
    let (color, color_values) = feature_type(
        state,
        ctx,
        text("Color", "Цвет"),
        &[("Black", "Чёрный"), ("White", "Белый")],
    )
    .await?;

    let category = CategoryService
        .create(
            state,
            ctx,
            CategoryPayload {
                name: text("Phone", "Телефон"),
                feature_types: Some(vec![ram, color]),
            },
        )
        .await?;
    let category = created_id(&category)?;

    let allowed: Vec<Uuid> = ram_values.iter().chain(&color_values).copied().collect();
    let product_type = ProductTypeService
        .create(
            state,
            ctx,
            ProductTypePayload {
                name: text("Pixel", "Пиксель"),
                description: text("A phone with a good camera", "Телефон с хорошей камерой"),
                short_description: None,
                category: Some(category),
                feature_values: Some(allowed),
                image: None,
            },
        )
        .await?;
    let product_type = created_id(&product_type)?;

    let mut products = Vec::new();
    for (ram_value, price) in ram_values.iter().zip([49_900_i64, 59_900]) {
        for color_value in &color_values {
            let payload = ProductPayload {
                price: Some(price),
                discount: Some(0),
                quantity: Some(10),
                product_type: Some(product_type),
                feature_values: Some(vec![*ram_value, *color_value]),
                images: None,
            };
            let created = ProductService.create(state, ctx, payload).await?;
            products.push(created_id(&created)?);
        }
    }

    PromoCodeService
        .create(
            state,
            ctx,
            PromoCodePayload {
                value: Some("WELCOME10".into()),
                discount: Some(10),
                is_active: Some(true),
                disable_on_use: Some(false),
                products: Some(products),
            },
        )
        .await?;

    Ok(product_type)
}
