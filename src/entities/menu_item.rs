use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub standard_portion: i32,
    pub standard_portion_unit: String,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub standard_labor_hours: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_detail::Entity")]
    RecipeDetails,
    #[sea_orm(has_many = "super::cost_standard::Entity")]
    CostStandards,
    #[sea_orm(has_many = "super::menu_pricing::Entity")]
    MenuPricing,
    #[sea_orm(has_many = "super::production_log::Entity")]
    ProductionLogs,
    #[sea_orm(has_many = "super::variance_record::Entity")]
    VarianceRecords,
}

impl Related<super::recipe_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeDetails.def()
    }
}

impl Related<super::cost_standard::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CostStandards.def()
    }
}

impl Related<super::menu_pricing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuPricing.def()
    }
}

impl Related<super::production_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionLogs.def()
    }
}

impl Related<super::variance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VarianceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
