use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "yield_tests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub raw_material_id: i64,
    pub test_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub ap_weight: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub ep_weight: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub yield_percentage: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::raw_material::Entity",
        from = "Column::RawMaterialId",
        to = "super::raw_material::Column::Id"
    )]
    RawMaterial,
}

impl Related<super::raw_material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RawMaterial.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
