//! Which feature values a product type may allow and a product may choose.
//!
//! Both checks walk the candidates in input order and stop at the first
//! blocking problem. They only read the graph; the caller writes the accepted
//! list in the same transaction the snapshot was read in.

use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};

use super::graph::CatalogGraph;
use super::model::{Category, FeatureValue, Id, ProductType, Relation};

pub const FEATURE_VALUES_FIELD: &str = "feature_values";

/// Feature values a candidate list is checked against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedSet(BTreeSet<Id>);

impl AllowedSet {
    /// Every value whose feature type is attached to the category.
    pub fn for_category(graph: &CatalogGraph, category: Id) -> AppResult<Self> {
        graph.get::<Category>(&category)?;
        let values = graph
            .members_of(Relation::CategoryFeatureTypes, category)
            .into_iter()
            .flat_map(|feature_type| graph.values_of(feature_type))
            .collect();
        Ok(Self(values))
    }

    /// The values a product type declares as its variant dimensions.
    pub fn for_product_type(graph: &CatalogGraph, product_type: Id) -> AppResult<Self> {
        graph.get::<ProductType>(&product_type)?;
        Ok(Self(
            graph
                .members_of(Relation::ProductTypeFeatureValues, product_type)
                .into_iter()
                .collect(),
        ))
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Id> for AllowedSet {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn resolve(graph: &CatalogGraph, id: Id) -> AppResult<&FeatureValue> {
    graph
        .get::<FeatureValue>(&id)
        .map_err(|err| err.in_field(FEATURE_VALUES_FIELD))
}

/// Checks the values a product type wants to allow. Repeated ids are
/// accepted once.
pub fn check_category_scope(
    graph: &CatalogGraph,
    allowed: &AllowedSet,
    candidates: &[Id],
) -> AppResult<Vec<Id>> {
    let mut accepted: Vec<Id> = Vec::with_capacity(candidates.len());
    for &id in candidates {
        let value = resolve(graph, id)?;
        if accepted.contains(&value.id) {
            continue;
        }
        if !allowed.contains(&value.id) {
            return Err(AppError::InvalidFeatureValue(id));
        }
        accepted.push(value.id);
    }
    Ok(accepted)
}

/// Checks the values a product picks: each must be allowed by its product
/// type and no two may share a feature type. Repeating the very same id is
/// accepted once.
pub fn check_product_variant(
    graph: &CatalogGraph,
    allowed: &AllowedSet,
    candidates: &[Id],
) -> AppResult<Vec<Id>> {
    let mut accepted: Vec<&FeatureValue> = Vec::with_capacity(candidates.len());
    for &id in candidates {
        let value = resolve(graph, id)?;
        if accepted.iter().any(|taken| taken.id == value.id) {
            continue;
        }
        let same_dimension = accepted
            .iter()
            .any(|taken| taken.feature_type == value.feature_type);
        if !allowed.contains(&value.id) || same_dimension {
            return Err(AppError::InvalidFeatureValue(id));
        }
        accepted.push(value);
    }
    Ok(accepted.into_iter().map(|value| value.id).collect())
}
