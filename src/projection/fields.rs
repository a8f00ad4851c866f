//! Field tables of every projectable entity.

use std::sync::LazyLock;

use serde_json::json;

use crate::catalog::intl::TextField;
use crate::catalog::model::{
    Category, EntityKind, FeatureType, FeatureValue, Language, Product, ProductType, PromoCode,
    Relation,
};

use super::registry::{FieldRegistry, Projectable};
use super::serializer::{expand_many, expand_one};

static LANGUAGE_FIELDS: LazyLock<FieldRegistry<Language>> = LazyLock::new(|| {
    FieldRegistry::<Language>::new()
        .field("code", |language, _| json!(language.code))
        .field("name", |language, _| json!(language.name))
});

static CATEGORY_FIELDS: LazyLock<FieldRegistry<Category>> = LazyLock::new(|| {
    FieldRegistry::<Category>::new()
        .field("id", |category, _| json!(category.id))
        .field("name", |category, ctx| {
            ctx.text(EntityKind::Category, category.id, TextField::Name)
        })
        .relation(
            "feature_types",
            |category, ctx| {
                json!(ctx.graph.members_of(Relation::CategoryFeatureTypes, category.id))
            },
            |category, ctx| {
                expand_many::<FeatureType>(
                    ctx,
                    ctx.graph.members_of(Relation::CategoryFeatureTypes, category.id),
                )
            },
        )
});

static FEATURE_TYPE_FIELDS: LazyLock<FieldRegistry<FeatureType>> = LazyLock::new(|| {
    FieldRegistry::<FeatureType>::new()
        .field("id", |feature_type, _| json!(feature_type.id))
        .field("name", |feature_type, ctx| {
            ctx.text(EntityKind::FeatureType, feature_type.id, TextField::Name)
        })
        .relation(
            "categories",
            |feature_type, ctx| {
                json!(ctx.graph.owners_of(Relation::CategoryFeatureTypes, feature_type.id))
            },
            |feature_type, ctx| {
                expand_many::<Category>(
                    ctx,
                    ctx.graph.owners_of(Relation::CategoryFeatureTypes, feature_type.id),
                )
            },
        )
        .relation(
            "feature_values",
            |feature_type, ctx| json!(ctx.graph.values_of(feature_type.id)),
            |feature_type, ctx| {
                expand_many::<FeatureValue>(ctx, ctx.graph.values_of(feature_type.id))
            },
        )
});

static FEATURE_VALUE_FIELDS: LazyLock<FieldRegistry<FeatureValue>> = LazyLock::new(|| {
    FieldRegistry::<FeatureValue>::new()
        .field("id", |value, _| json!(value.id))
        .field("name", |value, ctx| {
            ctx.text(EntityKind::FeatureValue, value.id, TextField::Name)
        })
        .relation(
            "feature_type",
            |value, _| json!(value.feature_type),
            |value, ctx| expand_one::<FeatureType>(ctx, value.feature_type),
        )
});

static PRODUCT_TYPE_FIELDS: LazyLock<FieldRegistry<ProductType>> = LazyLock::new(|| {
    FieldRegistry::<ProductType>::new()
        .field("id", |product_type, _| json!(product_type.id))
        .field("name", |product_type, ctx| {
            ctx.text(EntityKind::ProductType, product_type.id, TextField::Name)
        })
        .field("description", |product_type, ctx| {
            ctx.text(EntityKind::ProductType, product_type.id, TextField::Description)
        })
        .field("short_description", |product_type, ctx| {
            ctx.text(
                EntityKind::ProductType,
                product_type.id,
                TextField::ShortDescription,
            )
        })
        .field("image", |product_type, _| json!(product_type.image))
        .relation(
            "category",
            |product_type, _| json!(product_type.category),
            |product_type, ctx| expand_one::<Category>(ctx, product_type.category),
        )
        .relation(
            "feature_values",
            |product_type, ctx| {
                json!(ctx.graph.members_of(Relation::ProductTypeFeatureValues, product_type.id))
            },
            |product_type, ctx| {
                expand_many::<FeatureValue>(
                    ctx,
                    ctx.graph.members_of(Relation::ProductTypeFeatureValues, product_type.id),
                )
            },
        )
});

static PRODUCT_FIELDS: LazyLock<FieldRegistry<Product>> = LazyLock::new(|| {
    FieldRegistry::<Product>::new()
        .field("id", |product, _| json!(product.id))
        .field("price", |product, _| json!(product.price))
        .field("discount", |product, _| json!(product.discount))
        .field("quantity", |product, _| json!(product.quantity))
        .relation(
            "product_type",
            |product, _| json!(product.product_type),
            |product, ctx| expand_one::<ProductType>(ctx, product.product_type),
        )
        .relation(
            "feature_values",
            |product, ctx| {
                json!(ctx.graph.members_of(Relation::ProductFeatureValues, product.id))
            },
            |product, ctx| {
                expand_many::<FeatureValue>(
                    ctx,
                    ctx.graph.members_of(Relation::ProductFeatureValues, product.id),
                )
            },
        )
        .field("images", |product, _| json!(product.images))
});

static PROMO_CODE_FIELDS: LazyLock<FieldRegistry<PromoCode>> = LazyLock::new(|| {
    FieldRegistry::<PromoCode>::new()
        .field("id", |code, _| json!(code.id))
        .field("value", |code, _| json!(code.value))
        .field("discount", |code, _| json!(code.discount))
        .field("is_active", |code, _| json!(code.is_active))
        .field("disable_on_use", |code, _| json!(code.disable_on_use))
        .relation(
            "products",
            |code, ctx| json!(ctx.graph.members_of(Relation::PromoCodeProducts, code.id)),
            |code, ctx| {
                expand_many::<Product>(
                    ctx,
                    ctx.graph.members_of(Relation::PromoCodeProducts, code.id),
                )
            },
        )
});

impl Projectable for Language {
    fn registry() -> &'static FieldRegistry<Self> {
        &LANGUAGE_FIELDS
    }
}

impl Projectable for Category {
    fn registry() -> &'static FieldRegistry<Self> {
        &CATEGORY_FIELDS
    }
}

impl Projectable for FeatureType {
    fn registry() -> &'static FieldRegistry<Self> {
        &FEATURE_TYPE_FIELDS
    }
}

impl Projectable for FeatureValue {
    fn registry() -> &'static FieldRegistry<Self> {
        &FEATURE_VALUE_FIELDS
    }
}

impl Projectable for ProductType {
    fn registry() -> &'static FieldRegistry<Self> {
        &PRODUCT_TYPE_FIELDS
    }
}

impl Projectable for Product {
    fn registry() -> &'static FieldRegistry<Self> {
        &PRODUCT_FIELDS
    }
}

impl Projectable for PromoCode {
    fn registry() -> &'static FieldRegistry<Self> {
        &PROMO_CODE_FIELDS
    }
}

/// Builds every field table up front so the first request does not pay
/// for it.
pub fn init_registries() {
    LazyLock::force(&LANGUAGE_FIELDS);
    LazyLock::force(&CATEGORY_FIELDS);
    LazyLock::force(&FEATURE_TYPE_FIELDS);
    LazyLock::force(&FEATURE_VALUE_FIELDS);
    LazyLock::force(&PRODUCT_TYPE_FIELDS);
    LazyLock::force(&PRODUCT_FIELDS);
    LazyLock::force(&PROMO_CODE_FIELDS);
}
