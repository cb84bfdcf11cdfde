use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Material usage line on a production run. `unit_price` and `subtotal`
/// capture the price at time of use; they are stored, never recomputed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_log_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub production_log_id: i64,
    pub raw_material_id: i64,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub quantity_used: Decimal,
    pub unit: String,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub subtotal: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::production_log::Entity",
        from = "Column::ProductionLogId",
        to = "super::production_log::Column::Id"
    )]
    ProductionLog,
    #[sea_orm(
        belongs_to = "super::raw_material::Entity",
        from = "Column::RawMaterialId",
        to = "super::raw_material::Column::Id"
    )]
    RawMaterial,
}

impl Related<super::production_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionLog.def()
    }
}

impl Related<super::raw_material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RawMaterial.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
