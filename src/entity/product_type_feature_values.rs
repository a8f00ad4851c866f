use sea_orm::entity::prelude::*;

/// Feature values a product type allows its products to choose from.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_type_feature_values")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_type_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub feature_value_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
