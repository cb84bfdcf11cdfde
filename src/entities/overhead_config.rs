use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "overhead_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub allocation_method: String,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub allocation_rate: Decimal,
    pub effective_date: DateTimeWithTimeZone,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
