//! In-memory snapshot of the catalog: entities, their memberships and their
//! localized texts.
//!
//! A snapshot is loaded inside the storage transaction that will also write
//! the result, validated against, mutated, and then projected. Readers never
//! observe a half-applied `set_members`: every id is resolved before the
//! membership set is touched.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{AppError, AppResult};

use super::intl::{IntlStore, LocalizedText, TextField, TextKey};
use super::model::{
    Category, EntityKind, FeatureType, FeatureValue, Id, Language, Order, Product, ProductType,
    PromoCode, Relation,
};

/// A record kind stored in its own table of the graph.
pub trait CatalogEntity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;
    type Key: Ord + Clone + fmt::Display + Send + Sync;

    fn key(&self) -> Self::Key;
    fn table(graph: &CatalogGraph) -> &BTreeMap<Self::Key, Self>;
    fn table_mut(graph: &mut CatalogGraph) -> &mut BTreeMap<Self::Key, Self>;
}

#[derive(Debug, Clone, Default)]
pub struct CatalogGraph {
    languages: BTreeMap<String, Language>,
    categories: BTreeMap<Id, Category>,
    feature_types: BTreeMap<Id, FeatureType>,
    feature_values: BTreeMap<Id, FeatureValue>,
    product_types: BTreeMap<Id, ProductType>,
    products: BTreeMap<Id, Product>,
    promo_codes: BTreeMap<Id, PromoCode>,
    orders: BTreeMap<Id, Order>,
    memberships: BTreeMap<Relation, BTreeSet<(Id, Id)>>,
    texts: IntlStore,
}

macro_rules! catalog_entity {
    ($ty:ty, $kind:expr, $table:ident, $key:ty, |$e:ident| $key_expr:expr) => {
        impl CatalogEntity for $ty {
            const KIND: EntityKind = $kind;
            type Key = $key;

            fn key(&self) -> Self::Key {
                let $e = self;
                $key_expr
            }

            fn table(graph: &CatalogGraph) -> &BTreeMap<Self::Key, Self> {
                &graph.$table
            }

            fn table_mut(graph: &mut CatalogGraph) -> &mut BTreeMap<Self::Key, Self> {
                &mut graph.$table
            }
        }
    };
}

catalog_entity!(Language, EntityKind::Language, languages, String, |e| e.code.clone());
catalog_entity!(Category, EntityKind::Category, categories, Id, |e| e.id);
catalog_entity!(FeatureType, EntityKind::FeatureType, feature_types, Id, |e| e.id);
catalog_entity!(FeatureValue, EntityKind::FeatureValue, feature_values, Id, |e| e.id);
catalog_entity!(ProductType, EntityKind::ProductType, product_types, Id, |e| e.id);
catalog_entity!(Product, EntityKind::Product, products, Id, |e| e.id);
catalog_entity!(PromoCode, EntityKind::PromoCode, promo_codes, Id, |e| e.id);
catalog_entity!(Order, EntityKind::Order, orders, Id, |e| e.id);

impl CatalogGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<E: CatalogEntity>(&self, key: &E::Key) -> AppResult<&E> {
        E::table(self)
            .get(key)
            .ok_or_else(|| AppError::not_found(E::KIND, key))
    }

    pub fn get_mut<E: CatalogEntity>(&mut self, key: &E::Key) -> AppResult<&mut E> {
        E::table_mut(self)
            .get_mut(key)
            .ok_or_else(|| AppError::not_found(E::KIND, key))
    }

    pub fn contains<E: CatalogEntity>(&self, key: &E::Key) -> bool {
        E::table(self).contains_key(key)
    }

    /// All records of a kind in key order.
    pub fn list<E: CatalogEntity>(&self) -> Vec<&E> {
        E::table(self).values().collect()
    }

    pub fn list_by<E: CatalogEntity>(&self, predicate: impl Fn(&E) -> bool) -> Vec<&E> {
        E::table(self).values().filter(|e| predicate(e)).collect()
    }

    pub fn insert<E: CatalogEntity>(&mut self, entity: E) -> Option<E> {
        E::table_mut(self).insert(entity.key(), entity)
    }

    /// Removes a record together with its texts and every membership it
    /// takes part in, on either side.
    pub fn remove<E: CatalogEntity<Key = Id>>(&mut self, id: &Id) -> AppResult<E> {
        let removed = E::table_mut(self)
            .remove(id)
            .ok_or_else(|| AppError::not_found(E::KIND, id))?;

        for relation in Relation::all() {
            let owner_side = relation.owner_kind() == E::KIND;
            let member_side = relation.member_kind() == E::KIND;
            if !owner_side && !member_side {
                continue;
            }
            if let Some(pairs) = self.memberships.get_mut(&relation) {
                pairs.retain(|(owner, member)| {
                    !(owner_side && owner == id || member_side && member == id)
                });
            }
        }
        self.texts.remove_entity(E::KIND, *id);

        Ok(removed)
    }

    pub fn exists(&self, kind: EntityKind, id: Id) -> bool {
        match kind {
            EntityKind::Category => self.categories.contains_key(&id),
            EntityKind::FeatureType => self.feature_types.contains_key(&id),
            EntityKind::FeatureValue => self.feature_values.contains_key(&id),
            EntityKind::ProductType => self.product_types.contains_key(&id),
            EntityKind::Product => self.products.contains_key(&id),
            EntityKind::PromoCode => self.promo_codes.contains_key(&id),
            EntityKind::Order => self.orders.contains_key(&id),
            EntityKind::Language => false,
        }
    }

    fn ensure_exists(&self, kind: EntityKind, id: Id) -> AppResult<()> {
        if self.exists(kind, id) {
            Ok(())
        } else {
            Err(AppError::not_found(kind, id))
        }
    }

    /// Members of `owner` in id order.
    pub fn members_of(&self, relation: Relation, owner: Id) -> Vec<Id> {
        self.memberships
            .get(&relation)
            .map(|pairs| {
                pairs
                    .iter()
                    .filter(|(o, _)| *o == owner)
                    .map(|(_, member)| *member)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Owners holding `member`, i.e. the relation walked backwards.
    pub fn owners_of(&self, relation: Relation, member: Id) -> Vec<Id> {
        self.memberships
            .get(&relation)
            .map(|pairs| {
                pairs
                    .iter()
                    .filter(|(_, m)| *m == member)
                    .map(|(owner, _)| *owner)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_member(&self, relation: Relation, owner: Id, member: Id) -> bool {
        self.memberships
            .get(&relation)
            .is_some_and(|pairs| pairs.contains(&(owner, member)))
    }

    pub fn add_member(&mut self, relation: Relation, owner: Id, member: Id) -> AppResult<()> {
        self.ensure_exists(relation.owner_kind(), owner)?;
        self.ensure_exists(relation.member_kind(), member)?;
        self.memberships
            .entry(relation)
            .or_default()
            .insert((owner, member));
        Ok(())
    }

    pub fn remove_member(&mut self, relation: Relation, owner: Id, member: Id) -> AppResult<bool> {
        self.ensure_exists(relation.owner_kind(), owner)?;
        self.ensure_exists(relation.member_kind(), member)?;
        Ok(self
            .memberships
            .get_mut(&relation)
            .is_some_and(|pairs| pairs.remove(&(owner, member))))
    }

    /// Replaces the whole membership set of `owner`. Nothing changes unless
    /// every id resolves.
    pub fn set_members(&mut self, relation: Relation, owner: Id, members: &[Id]) -> AppResult<()> {
        self.ensure_exists(relation.owner_kind(), owner)?;
        for member in members {
            self.ensure_exists(relation.member_kind(), *member)?;
        }

        let pairs = self.memberships.entry(relation).or_default();
        pairs.retain(|(o, _)| *o != owner);
        pairs.extend(members.iter().map(|member| (owner, *member)));
        Ok(())
    }

    pub fn texts(&self) -> &IntlStore {
        &self.texts
    }

    pub fn text(&self, kind: EntityKind, id: Id, field: TextField) -> Option<&LocalizedText> {
        self.texts.all(&TextKey::new(kind, id, field))
    }

    pub fn set_text(&mut self, kind: EntityKind, id: Id, field: TextField, text: &LocalizedText) {
        self.texts.merge(TextKey::new(kind, id, field), text);
    }

    /// Feature values owned by a feature type.
    pub fn values_of(&self, feature_type: Id) -> Vec<Id> {
        self.feature_values
            .values()
            .filter(|value| value.feature_type == feature_type)
            .map(|value| value.id)
            .collect()
    }

    pub fn orders_using(&self, promo_code: Id) -> usize {
        self.orders
            .values()
            .filter(|order| order.promo_code == Some(promo_code))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn graph_with_category_and_types() -> (CatalogGraph, Id, Id, Id) {
        let mut graph = CatalogGraph::new();
        let category = Uuid::from_u128(1);
        let ram = Uuid::from_u128(10);
        let color = Uuid::from_u128(20);
        graph.insert(Category { id: category });
        graph.insert(FeatureType { id: ram });
        graph.insert(FeatureType { id: color });
        (graph, category, ram, color)
    }

    #[test]
    fn membership_is_navigable_both_ways() {
        let (mut graph, category, ram, color) = graph_with_category_and_types();
        graph
            .set_members(Relation::CategoryFeatureTypes, category, &[ram, color])
            .unwrap();

        assert_eq!(
            graph.members_of(Relation::CategoryFeatureTypes, category),
            vec![ram, color]
        );
        assert_eq!(
            graph.owners_of(Relation::CategoryFeatureTypes, color),
            vec![category]
        );
    }

    #[test]
    fn set_members_with_unknown_id_changes_nothing() {
        let (mut graph, category, ram, color) = graph_with_category_and_types();
        graph
            .add_member(Relation::CategoryFeatureTypes, category, ram)
            .unwrap();

        let err = graph
            .set_members(
                Relation::CategoryFeatureTypes,
                category,
                &[color, Uuid::from_u128(99)],
            )
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::NotFound {
                kind: EntityKind::FeatureType,
                ..
            }
        ));
        assert_eq!(
            graph.members_of(Relation::CategoryFeatureTypes, category),
            vec![ram]
        );
    }

    #[test]
    fn add_member_rejects_missing_owner() {
        let (mut graph, _, ram, _) = graph_with_category_and_types();
        let err = graph
            .add_member(Relation::CategoryFeatureTypes, Uuid::from_u128(99), ram)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound {
                kind: EntityKind::Category,
                ..
            }
        ));
    }

    #[test]
    fn removing_an_entity_detaches_its_memberships() {
        let (mut graph, category, ram, color) = graph_with_category_and_types();
        graph
            .set_members(Relation::CategoryFeatureTypes, category, &[ram, color])
            .unwrap();

        graph.remove::<FeatureType>(&ram).unwrap();

        assert_eq!(
            graph.members_of(Relation::CategoryFeatureTypes, category),
            vec![color]
        );
        assert!(graph.get::<FeatureType>(&ram).is_err());
    }

    #[test]
    fn list_by_filters_in_key_order() {
        let (mut graph, _, ram, color) = graph_with_category_and_types();
        let values: Vec<Id> = (100..103).map(Uuid::from_u128).collect();
        graph.insert(FeatureValue { id: values[0], feature_type: ram });
        graph.insert(FeatureValue { id: values[1], feature_type: color });
        graph.insert(FeatureValue { id: values[2], feature_type: ram });

        let ram_values: Vec<Id> = graph
            .list_by::<FeatureValue>(|value| value.feature_type == ram)
            .into_iter()
            .map(|value| value.id)
            .collect();
        assert_eq!(ram_values, vec![values[0], values[2]]);
        assert_eq!(graph.values_of(color), vec![values[1]]);
    }
}
