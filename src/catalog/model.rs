use std::fmt;

use serde::Serialize;
use uuid::Uuid;

pub type Id = Uuid;

/// Every kind of record the catalog graph knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Language,
    Category,
    FeatureType,
    FeatureValue,
    ProductType,
    Product,
    PromoCode,
    Order,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Language => "language",
            EntityKind::Category => "category",
            EntityKind::FeatureType => "feature_type",
            EntityKind::FeatureValue => "feature_value",
            EntityKind::ProductType => "product_type",
            EntityKind::Product => "product",
            EntityKind::PromoCode => "promo_code",
            EntityKind::Order => "order",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value {
            "language" => EntityKind::Language,
            "category" => EntityKind::Category,
            "feature_type" => EntityKind::FeatureType,
            "feature_value" => EntityKind::FeatureValue,
            "product_type" => EntityKind::ProductType,
            "product" => EntityKind::Product,
            "promo_code" => EntityKind::PromoCode,
            "order" => EntityKind::Order,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureType {
    pub id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureValue {
    pub id: Id,
    pub feature_type: Id,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductType {
    pub id: Id,
    pub category: Id,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Id,
    /// Minor currency units.
    pub price: i64,
    pub discount: i32,
    pub quantity: i32,
    pub product_type: Id,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCode {
    pub id: Id,
    /// Always stored lowercased.
    pub value: String,
    pub discount: i32,
    pub is_active: bool,
    pub disable_on_use: bool,
}

/// The slice of an order the catalog cares about. Orders themselves are
/// managed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Id,
    pub promo_code: Option<Id>,
}

/// Many-to-many memberships between catalog entities. Each relation is
/// stored once as `(owner, member)` pairs and can be walked from both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    CategoryFeatureTypes,
    ProductTypeFeatureValues,
    ProductFeatureValues,
    PromoCodeProducts,
}

impl Relation {
    pub fn owner_kind(&self) -> EntityKind {
        match self {
            Relation::CategoryFeatureTypes => EntityKind::Category,
            Relation::ProductTypeFeatureValues => EntityKind::ProductType,
            Relation::ProductFeatureValues => EntityKind::Product,
            Relation::PromoCodeProducts => EntityKind::PromoCode,
        }
    }

    pub fn member_kind(&self) -> EntityKind {
        match self {
            Relation::CategoryFeatureTypes => EntityKind::FeatureType,
            Relation::ProductTypeFeatureValues | Relation::ProductFeatureValues => {
                EntityKind::FeatureValue
            }
            Relation::PromoCodeProducts => EntityKind::Product,
        }
    }

    pub fn all() -> [Relation; 4] {
        [
            Relation::CategoryFeatureTypes,
            Relation::ProductTypeFeatureValues,
            Relation::ProductFeatureValues,
            Relation::PromoCodeProducts,
        ]
    }
}
