use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "raw_materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub current_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub yield_percentage: Decimal,
    pub supplier_id: Option<i64>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    #[sea_orm(has_many = "super::yield_test::Entity")]
    YieldTests,
    #[sea_orm(has_many = "super::recipe_detail::Entity")]
    RecipeDetails,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::yield_test::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::YieldTests.def()
    }
}

impl Related<super::recipe_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
