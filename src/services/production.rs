use crate::{
    db::DbPool,
    entities::{
        menu_item::Entity as MenuItemEntity, production_log,
        production_log::Entity as ProductionLogEntity, production_log_detail,
        production_log_detail::Entity as ProductionDetailEntity,
        raw_material::Entity as RawMaterialEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Input payload for logging a production run
#[derive(Debug, Clone)]
pub struct CreateProductionLogInput {
    pub menu_item_id: i64,
    pub production_date: Option<DateTime<Utc>>,
    pub portions_produced: i32,
    pub portions_sold: Option<i32>,
    pub labor_hours_actual: Option<Decimal>,
    pub notes: Option<String>,
}

/// Input payload for amending a production run; None fields are untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateProductionLogInput {
    pub production_date: Option<DateTime<Utc>>,
    pub portions_produced: Option<i32>,
    pub portions_sold: Option<Option<i32>>,
    pub labor_hours_actual: Option<Option<Decimal>>,
    pub notes: Option<String>,
}

/// Filters accepted by the production log list endpoint
#[derive(Debug, Clone, Default)]
pub struct ProductionLogFilter {
    pub menu_item_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Input payload for a material usage line on a production run
#[derive(Debug, Clone)]
pub struct AddProductionDetailInput {
    pub raw_material_id: i64,
    pub quantity_used: Decimal,
    pub unit: Option<String>,
    /// Price at time of use; defaults to the material's current price
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProductionDetailInput {
    pub quantity_used: Option<Decimal>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
}

/// A production run with its material usage lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLogView {
    #[serde(flatten)]
    pub log: production_log::Model,
    pub details: Vec<production_log_detail::Model>,
}

#[derive(Clone)]
pub struct ProductionService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ProductionService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn connection(&self) -> &DbPool {
        &self.db_pool
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreateProductionLogInput,
    ) -> Result<production_log::Model, ServiceError> {
        if input.portions_produced <= 0 {
            return Err(ServiceError::InvalidInput(
                "portions_produced must be greater than zero".into(),
            ));
        }

        let db = self.connection();
        MenuItemEntity::find_by_id(input.menu_item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item {} not found", input.menu_item_id))
            })?;

        let now = Utc::now();
        let model = production_log::ActiveModel {
            id: Default::default(),
            menu_item_id: Set(input.menu_item_id),
            production_date: Set(input.production_date.unwrap_or(now).into()),
            portions_produced: Set(input.portions_produced),
            portions_sold: Set(input.portions_sold),
            labor_hours_actual: Set(input.labor_hours_actual),
            notes: Set(input.notes),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::ProductionLogged {
                production_log_id: created.id,
                menu_item_id: created.menu_item_id,
                portions_produced: created.portions_produced,
            })
            .await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<ProductionLogView, ServiceError> {
        let db = self.connection();
        let log = ProductionLogEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Production log {} not found", id)))?;

        let details = ProductionDetailEntity::find()
            .filter(production_log_detail::Column::ProductionLogId.eq(id))
            .order_by_asc(production_log_detail::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(ProductionLogView { log, details })
    }

    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        filter: ProductionLogFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<production_log::Model>, u64), ServiceError> {
        let db = self.connection();
        let per_page = per_page.max(1);
        let mut query = ProductionLogEntity::find();

        if let Some(menu_item_id) = filter.menu_item_id {
            query = query.filter(production_log::Column::MenuItemId.eq(menu_item_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(production_log::Column::ProductionDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(production_log::Column::ProductionDate.lte(end));
        }

        let paginator = query
            .order_by_desc(production_log::Column::ProductionDate)
            .paginate(db, per_page);
        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let logs = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((logs, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: UpdateProductionLogInput,
    ) -> Result<production_log::Model, ServiceError> {
        let db = self.connection();
        let mut log = ProductionLogEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Production log {} not found", id)))?;

        if let Some(date) = input.production_date {
            log.production_date = date.into();
        }
        if let Some(portions) = input.portions_produced {
            if portions <= 0 {
                return Err(ServiceError::InvalidInput(
                    "portions_produced must be greater than zero".into(),
                ));
            }
            log.portions_produced = portions;
        }
        if let Some(sold) = input.portions_sold {
            log.portions_sold = sold;
        }
        if let Some(hours) = input.labor_hours_actual {
            log.labor_hours_actual = hours;
        }
        if let Some(notes) = input.notes {
            log.notes = Some(notes);
        }
        log.updated_at = Utc::now().into();

        log.into_active_model()
            .reset_all()
            .update(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Deletes a production run together with its usage lines.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let db = self.connection();
        let log = ProductionLogEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Production log {} not found", id)))?;

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        ProductionDetailEntity::delete_many()
            .filter(production_log_detail::Column::ProductionLogId.eq(id))
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        log.delete(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::ProductionLogDeleted(id))
            .await;

        Ok(())
    }

    /// Records material usage against a production run. `unit_price` and
    /// `subtotal` are captured at write time and never recomputed from the
    /// material afterwards.
    #[instrument(skip(self, input))]
    pub async fn add_detail(
        &self,
        production_log_id: i64,
        input: AddProductionDetailInput,
    ) -> Result<production_log_detail::Model, ServiceError> {
        if input.quantity_used <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "quantity_used must be greater than zero".into(),
            ));
        }

        let db = self.connection();
        ProductionLogEntity::find_by_id(production_log_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Production log {} not found", production_log_id))
            })?;

        let material = RawMaterialEntity::find_by_id(input.raw_material_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Raw material {} not found",
                    input.raw_material_id
                ))
            })?;

        let unit_price = input.unit_price.unwrap_or(material.current_price);
        let subtotal = input.quantity_used * unit_price;

        let model = production_log_detail::ActiveModel {
            id: Default::default(),
            production_log_id: Set(production_log_id),
            raw_material_id: Set(input.raw_material_id),
            quantity_used: Set(input.quantity_used),
            unit: Set(input.unit.unwrap_or(material.unit)),
            unit_price: Set(unit_price),
            subtotal: Set(subtotal),
            created_at: Set(Utc::now().into()),
        };

        model.insert(db).await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self, input))]
    pub async fn update_detail(
        &self,
        detail_id: i64,
        input: UpdateProductionDetailInput,
    ) -> Result<production_log_detail::Model, ServiceError> {
        let db = self.connection();
        let mut detail = ProductionDetailEntity::find_by_id(detail_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Production detail {} not found", detail_id))
            })?;

        if let Some(quantity) = input.quantity_used {
            if quantity <= Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "quantity_used must be greater than zero".into(),
                ));
            }
            detail.quantity_used = quantity;
        }
        if let Some(unit) = input.unit {
            detail.unit = unit;
        }
        if let Some(price) = input.unit_price {
            detail.unit_price = price;
        }
        detail.subtotal = detail.quantity_used * detail.unit_price;

        detail
            .into_active_model()
            .reset_all()
            .update(db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn remove_detail(&self, detail_id: i64) -> Result<(), ServiceError> {
        let db = self.connection();
        let detail = ProductionDetailEntity::find_by_id(detail_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Production detail {} not found", detail_id))
            })?;

        detail.delete(db).await.map_err(ServiceError::db_error)?;
        Ok(())
    }
}
