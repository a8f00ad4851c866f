//! sea-orm adapter between the catalog tables and [`CatalogGraph`].
//!
//! Services load a snapshot inside their transaction, mutate it, then call
//! [`save`] for every record they touched. Each save rewrites the record's
//! row, the memberships it owns and its localized texts.
//!
//! Writes run `SERIALIZABLE`: checks are made against the snapshot, so two
//! writes that each invalidate what the other checked cannot both commit.
//! The loser fails with [`AppError::Conflict`].

use std::collections::BTreeMap;

use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    IsolationLevel, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::catalog::graph::CatalogGraph;
use crate::catalog::guard::translate_duplicate_key;
use crate::catalog::intl::{LocalizedText, TextField};
use crate::catalog::model::{
    Category, EntityKind, FeatureType, FeatureValue, Id, Language, Order, Product, ProductType,
    PromoCode, Relation,
};
use crate::entity::{
    categories, category_feature_types, feature_types, feature_values, languages,
    localized_texts, orders, product_feature_values, product_images, product_type_feature_values,
    product_types, products, promo_code_products, promo_codes,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Insert,
    Update,
}

/// Opens the transaction a write validates and commits in.
pub async fn begin_write<C: TransactionTrait>(conn: &C) -> AppResult<DatabaseTransaction> {
    Ok(conn
        .begin_with_config(Some(IsolationLevel::Serializable), None)
        .await?)
}

/// Opens a read-only transaction so every table of a snapshot is read at
/// the same point in time.
pub async fn begin_read<C: TransactionTrait>(conn: &C) -> AppResult<DatabaseTransaction> {
    Ok(conn
        .begin_with_config(
            Some(IsolationLevel::RepeatableRead),
            Some(AccessMode::ReadOnly),
        )
        .await?)
}

/// Reads every catalog table into a fresh graph. Orders are left out; see
/// [`load_dependents`].
pub async fn load_catalog<C: ConnectionTrait>(conn: &C) -> AppResult<CatalogGraph> {
    let mut graph = CatalogGraph::new();

    for row in languages::Entity::find().all(conn).await? {
        graph.insert(Language {
            code: row.code,
            name: row.name,
        });
    }
    for row in categories::Entity::find().all(conn).await? {
        graph.insert(Category { id: row.id });
    }
    for row in feature_types::Entity::find().all(conn).await? {
        graph.insert(FeatureType { id: row.id });
    }
    for row in feature_values::Entity::find().all(conn).await? {
        graph.insert(FeatureValue {
            id: row.id,
            feature_type: row.feature_type_id,
        });
    }
    for row in product_types::Entity::find().all(conn).await? {
        graph.insert(ProductType {
            id: row.id,
            category: row.category_id,
            image: row.image,
        });
    }

    let mut images: BTreeMap<Id, Vec<String>> = BTreeMap::new();
    for row in product_images::Entity::find()
        .order_by_asc(product_images::Column::ProductId)
        .order_by_asc(product_images::Column::Position)
        .all(conn)
        .await?
    {
        images.entry(row.product_id).or_default().push(row.path);
    }
    for row in products::Entity::find().all(conn).await? {
        graph.insert(Product {
            id: row.id,
            price: row.price,
            discount: row.discount,
            quantity: row.quantity,
            product_type: row.product_type_id,
            images: images.remove(&row.id).unwrap_or_default(),
        });
    }
    for row in promo_codes::Entity::find().all(conn).await? {
        graph.insert(PromoCode {
            id: row.id,
            value: row.value,
            discount: row.discount,
            is_active: row.is_active,
            disable_on_use: row.disable_on_use,
        });
    }
    let mut pairs: Vec<(Relation, Id, Id)> = Vec::new();
    pairs.extend(
        category_feature_types::Entity::find()
            .all(conn)
            .await?
            .into_iter()
            .map(|row| (Relation::CategoryFeatureTypes, row.category_id, row.feature_type_id)),
    );
    pairs.extend(
        product_type_feature_values::Entity::find()
            .all(conn)
            .await?
            .into_iter()
            .map(|row| {
                (
                    Relation::ProductTypeFeatureValues,
                    row.product_type_id,
                    row.feature_value_id,
                )
            }),
    );
    pairs.extend(
        product_feature_values::Entity::find()
            .all(conn)
            .await?
            .into_iter()
            .map(|row| (Relation::ProductFeatureValues, row.product_id, row.feature_value_id)),
    );
    pairs.extend(
        promo_code_products::Entity::find()
            .all(conn)
            .await?
            .into_iter()
            .map(|row| (Relation::PromoCodeProducts, row.promo_code_id, row.product_id)),
    );
    for (relation, owner, member) in pairs {
        graph
            .add_member(relation, owner, member)
            .map_err(|err| anyhow::anyhow!("dangling {relation:?} row: {err}"))?;
    }

    for row in localized_texts::Entity::find().all(conn).await? {
        let (Some(kind), Some(field)) = (
            EntityKind::parse(&row.entity_kind),
            TextField::parse(&row.field),
        ) else {
            tracing::warn!(
                entity_kind = %row.entity_kind,
                field = %row.field,
                "skipping text of unknown entity or field"
            );
            continue;
        };
        let text: LocalizedText = [(row.language, row.value)].into_iter().collect();
        graph.set_text(kind, row.entity_id, field, &text);
    }

    Ok(graph)
}

/// Adds the records outside the catalog tables that may keep `id` from being
/// deleted. Only orders qualify, and only those using the promo code.
pub async fn load_dependents<C: ConnectionTrait>(
    conn: &C,
    graph: &mut CatalogGraph,
    kind: EntityKind,
    id: Id,
) -> AppResult<()> {
    if kind != EntityKind::PromoCode {
        return Ok(());
    }
    for row in orders::Entity::find()
        .filter(orders::Column::PromoCodeId.eq(id))
        .all(conn)
        .await?
    {
        graph.insert(Order {
            id: row.id,
            promo_code: row.promo_code_id,
        });
    }
    Ok(())
}

/// Writes one record of the graph: its row, owned memberships and texts.
pub async fn save<C: ConnectionTrait>(
    conn: &C,
    graph: &CatalogGraph,
    kind: EntityKind,
    id: Id,
    mode: SaveMode,
) -> AppResult<()> {
    match kind {
        EntityKind::Category => {
            graph.get::<Category>(&id)?;
            if mode == SaveMode::Insert {
                categories::ActiveModel { id: Set(id) }.insert(conn).await?;
            }
            save_members(conn, graph, Relation::CategoryFeatureTypes, id).await?;
        }
        EntityKind::FeatureType => {
            graph.get::<FeatureType>(&id)?;
            if mode == SaveMode::Insert {
                feature_types::ActiveModel { id: Set(id) }.insert(conn).await?;
            }
        }
        EntityKind::FeatureValue => {
            let value = graph.get::<FeatureValue>(&id)?;
            let active = feature_values::ActiveModel {
                id: Set(id),
                feature_type_id: Set(value.feature_type),
            };
            write_row(conn, active, mode).await?;
        }
        EntityKind::ProductType => {
            let product_type = graph.get::<ProductType>(&id)?;
            let active = product_types::ActiveModel {
                id: Set(id),
                category_id: Set(product_type.category),
                image: Set(product_type.image.clone()),
            };
            write_row(conn, active, mode).await?;
            save_members(conn, graph, Relation::ProductTypeFeatureValues, id).await?;
        }
        EntityKind::Product => {
            let product = graph.get::<Product>(&id)?;
            let active = products::ActiveModel {
                id: Set(id),
                product_type_id: Set(product.product_type),
                price: Set(product.price),
                discount: Set(product.discount),
                quantity: Set(product.quantity),
            };
            write_row(conn, active, mode).await?;
            save_images(conn, id, &product.images).await?;
            save_members(conn, graph, Relation::ProductFeatureValues, id).await?;
        }
        EntityKind::PromoCode => {
            let code = graph.get::<PromoCode>(&id)?;
            let active = promo_codes::ActiveModel {
                id: Set(id),
                value: Set(code.value.clone()),
                discount: Set(code.discount),
                is_active: Set(code.is_active),
                disable_on_use: Set(code.disable_on_use),
            };
            write_row(conn, active, mode)
                .await
                .map_err(|err| match err {
                    AppError::OrmError(err) => {
                        translate_duplicate_key(err, EntityKind::PromoCode, "value")
                    }
                    other => other,
                })?;
            save_members(conn, graph, Relation::PromoCodeProducts, id).await?;
        }
        EntityKind::Language | EntityKind::Order => {
            return Err(anyhow::anyhow!("{kind} records are not written by the catalog").into());
        }
    }

    save_texts(conn, graph, kind, id).await
}

async fn write_row<C, A>(conn: &C, active: A, mode: SaveMode) -> AppResult<()>
where
    C: ConnectionTrait,
    A: ActiveModelTrait + sea_orm::ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: sea_orm::IntoActiveModel<A>,
{
    match mode {
        SaveMode::Insert => {
            active.insert(conn).await?;
        }
        SaveMode::Update => {
            active.update(conn).await?;
        }
    }
    Ok(())
}

/// Replaces the stored texts of one record with the graph's.
async fn save_texts<C: ConnectionTrait>(
    conn: &C,
    graph: &CatalogGraph,
    kind: EntityKind,
    id: Id,
) -> AppResult<()> {
    localized_texts::Entity::delete_many()
        .filter(localized_texts::Column::EntityKind.eq(kind.as_str()))
        .filter(localized_texts::Column::EntityId.eq(id))
        .exec(conn)
        .await?;

    let rows: Vec<localized_texts::ActiveModel> = graph
        .texts()
        .entity_texts(kind, id)
        .flat_map(|(key, text)| {
            text.iter().map(move |(language, value)| localized_texts::ActiveModel {
                entity_kind: Set(kind.as_str().to_string()),
                entity_id: Set(id),
                field: Set(key.field.as_str().to_string()),
                language: Set(language.to_string()),
                value: Set(value.to_string()),
            })
        })
        .collect();
    if rows.is_empty() {
        return Ok(());
    }
    localized_texts::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn save_images<C: ConnectionTrait>(conn: &C, product: Id, images: &[String]) -> AppResult<()> {
    product_images::Entity::delete_many()
        .filter(product_images::Column::ProductId.eq(product))
        .exec(conn)
        .await?;
    if images.is_empty() {
        return Ok(());
    }
    let rows = images
        .iter()
        .enumerate()
        .map(|(position, path)| product_images::ActiveModel {
            product_id: Set(product),
            position: Set(position as i32),
            path: Set(path.clone()),
        });
    product_images::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Rewrites the join rows of `(relation, owner)` from the graph.
macro_rules! replace_members {
    ($conn:expr, $table:ident, $owner_col:ident, $owner_field:ident, $member_field:ident, $owner:expr, $members:expr) => {{
        $table::Entity::delete_many()
            .filter($table::Column::$owner_col.eq($owner))
            .exec($conn)
            .await?;
        if !$members.is_empty() {
            let rows = $members.iter().map(|member| $table::ActiveModel {
                $owner_field: Set($owner),
                $member_field: Set(*member),
            });
            $table::Entity::insert_many(rows)
                .exec_without_returning($conn)
                .await?;
        }
    }};
}

async fn save_members<C: ConnectionTrait>(
    conn: &C,
    graph: &CatalogGraph,
    relation: Relation,
    owner: Id,
) -> AppResult<()> {
    let members = graph.members_of(relation, owner);
    match relation {
        Relation::CategoryFeatureTypes => replace_members!(
            conn,
            category_feature_types,
            CategoryId,
            category_id,
            feature_type_id,
            owner,
            members
        ),
        Relation::ProductTypeFeatureValues => replace_members!(
            conn,
            product_type_feature_values,
            ProductTypeId,
            product_type_id,
            feature_value_id,
            owner,
            members
        ),
        Relation::ProductFeatureValues => replace_members!(
            conn,
            product_feature_values,
            ProductId,
            product_id,
            feature_value_id,
            owner,
            members
        ),
        Relation::PromoCodeProducts => replace_members!(
            conn,
            promo_code_products,
            PromoCodeId,
            promo_code_id,
            product_id,
            owner,
            members
        ),
    }
    Ok(())
}

/// Deletes a record and its texts. Join rows and product images go with it
/// through `ON DELETE CASCADE`.
pub async fn delete_entity<C: ConnectionTrait>(conn: &C, kind: EntityKind, id: Id) -> AppResult<()> {
    let result = match kind {
        EntityKind::Category => categories::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::FeatureType => feature_types::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::FeatureValue => feature_values::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::ProductType => product_types::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::Product => products::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::PromoCode => promo_codes::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::Language | EntityKind::Order => {
            return Err(anyhow::anyhow!("{kind} records are not deleted by the catalog").into());
        }
    };
    if result.rows_affected == 0 {
        return Err(AppError::not_found(kind, id));
    }

    localized_texts::Entity::delete_many()
        .filter(localized_texts::Column::EntityKind.eq(kind.as_str()))
        .filter(localized_texts::Column::EntityId.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}
