use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "feature_values")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub feature_type_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::feature_types::Entity",
        from = "Column::FeatureTypeId",
        to = "super::feature_types::Column::Id"
    )]
    FeatureType,
}

impl Related<super::feature_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeatureType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
