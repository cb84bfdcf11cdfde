use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only snapshot of a menu item's standard cost. Rows are never
/// updated in place; the current standard is the latest effective_date.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cost_standards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub menu_item_id: i64,
    pub effective_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub material_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub labor_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub overhead_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub total_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub cost_per_portion: Decimal,
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
}

impl Related<super::menu_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
