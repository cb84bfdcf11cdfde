use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only comparison of a production run's actual cost against the
/// standard in force at calculation time. Negative variance is favorable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub menu_item_id: i64,
    pub production_log_id: i64,
    pub variance_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub standard_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub actual_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub variance_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub variance_percentage: Decimal,
    pub variance_type: String,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::menu_item::Entity",
        from = "Column::MenuItemId",
        to = "super::menu_item::Column::Id"
    )]
    MenuItem,
    #[sea_orm(
        belongs_to = "super::production_log::Entity",
        from = "Column::ProductionLogId",
        to = "super::production_log::Column::Id"
    )]
    ProductionLog,
}

impl Related<super::menu_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItem.def()
    }
}

impl Related<super::production_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
