use crate::{
    costing::{self, OverheadMethod, OverheadPolicy, RecipeCostLine, RoundedCostBreakdown},
    db::DbPool,
    entities::{
        cost_standard, cost_standard::Entity as CostStandardEntity,
        menu_item::Entity as MenuItemEntity, overhead_config,
        overhead_config::Entity as OverheadConfigEntity, raw_material,
        raw_material::Entity as RawMaterialEntity, recipe_detail,
        recipe_detail::Entity as RecipeDetailEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::settings::SettingsService,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// Input payload for recording a new overhead configuration
#[derive(Debug, Clone)]
pub struct CreateOverheadConfigInput {
    pub allocation_method: String,
    pub allocation_rate: Decimal,
    pub effective_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// A freshly calculated standard: the persisted snapshot plus the
/// presentation-rounded breakdown it was derived from.
#[derive(Debug, Clone, Serialize)]
pub struct CostStandardResult {
    pub cost_standard: cost_standard::Model,
    pub breakdown: RoundedCostBreakdown,
}

#[derive(Clone)]
pub struct CostStandardService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl CostStandardService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn connection(&self) -> &DbPool {
        &self.db_pool
    }

    /// Calculates and persists a new cost standard for a menu item.
    ///
    /// Each calculation appends a snapshot row; earlier standards are kept
    /// for variance history. Inputs are read fresh at call time: current
    /// material prices and yields, the current labor rate, and the latest
    /// overhead configuration.
    #[instrument(skip(self))]
    pub async fn calculate(&self, menu_item_id: i64) -> Result<CostStandardResult, ServiceError> {
        let db = self.connection();

        let item = MenuItemEntity::find_by_id(menu_item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item {} not found", menu_item_id))
            })?;

        let details = RecipeDetailEntity::find()
            .filter(recipe_detail::Column::MenuItemId.eq(menu_item_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let material_ids: Vec<i64> = details.iter().map(|d| d.raw_material_id).collect();
        let materials: HashMap<i64, raw_material::Model> = RawMaterialEntity::find()
            .filter(raw_material::Column::Id.is_in(material_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let mut lines = Vec::with_capacity(details.len());
        for detail in &details {
            let material = materials.get(&detail.raw_material_id).ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Raw material {} referenced by recipe line {} not found",
                    detail.raw_material_id, detail.id
                ))
            })?;
            lines.push(RecipeCostLine {
                material,
                quantity: detail.quantity,
            });
        }

        let settings = SettingsService::new(self.db_pool.clone(), self.event_sender.clone());
        let labor_rate = settings.current_labor_rate().await?;
        let policy = self.current_overhead_policy().await?;

        let breakdown = costing::cost_standard(&item, &lines, labor_rate, policy.as_ref())?;

        let now = Utc::now();
        let snapshot = cost_standard::ActiveModel {
            id: Default::default(),
            menu_item_id: Set(menu_item_id),
            effective_date: Set(now.into()),
            material_cost: Set(breakdown.material_cost),
            labor_cost: Set(breakdown.labor_cost),
            overhead_cost: Set(breakdown.overhead_cost),
            total_cost: Set(breakdown.total_cost),
            cost_per_portion: Set(breakdown.cost_per_portion),
            created_at: Set(now.into()),
        };

        let created = snapshot
            .insert(db)
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::CostStandardCalculated {
                cost_standard_id: created.id,
                menu_item_id,
                total_cost: created.total_cost,
            })
            .await;

        Ok(CostStandardResult {
            cost_standard: created,
            breakdown: breakdown.rounded(),
        })
    }

    /// Latest standard for a menu item, by effective date.
    #[instrument(skip(self))]
    pub async fn latest(
        &self,
        menu_item_id: i64,
    ) -> Result<Option<cost_standard::Model>, ServiceError> {
        CostStandardEntity::find()
            .filter(cost_standard::Column::MenuItemId.eq(menu_item_id))
            .order_by_desc(cost_standard::Column::EffectiveDate)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Calculation history for a menu item, newest first.
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        menu_item_id: i64,
        limit: u64,
    ) -> Result<Vec<cost_standard::Model>, ServiceError> {
        CostStandardEntity::find()
            .filter(cost_standard::Column::MenuItemId.eq(menu_item_id))
            .order_by_desc(cost_standard::Column::EffectiveDate)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(ServiceError::db_error)
    }

    /// The overhead configuration currently in force, if any.
    #[instrument(skip(self))]
    pub async fn latest_overhead_config(
        &self,
    ) -> Result<Option<overhead_config::Model>, ServiceError> {
        OverheadConfigEntity::find()
            .order_by_desc(overhead_config::Column::EffectiveDate)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Returns the overhead policy derived from the latest configuration.
    /// A stored row with an unrecognized method behaves like no policy.
    pub async fn current_overhead_policy(
        &self,
    ) -> Result<Option<OverheadPolicy>, ServiceError> {
        Ok(self
            .latest_overhead_config()
            .await?
            .as_ref()
            .and_then(OverheadPolicy::from_config))
    }

    /// Appends a new overhead configuration. The method string is validated
    /// strictly on write; only reads of historical rows are lenient.
    #[instrument(skip(self, input))]
    pub async fn create_overhead_config(
        &self,
        input: CreateOverheadConfigInput,
    ) -> Result<overhead_config::Model, ServiceError> {
        if OverheadMethod::parse(&input.allocation_method).is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "Unknown allocation method '{}'; expected one of percentage_labor, percentage_material, per_unit",
                input.allocation_method
            )));
        }
        if input.allocation_rate < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "allocation_rate must not be negative".into(),
            ));
        }

        let now = Utc::now();
        let effective = input.effective_date.unwrap_or(now);
        let model = overhead_config::ActiveModel {
            id: Default::default(),
            allocation_method: Set(input.allocation_method),
            allocation_rate: Set(input.allocation_rate),
            effective_date: Set(effective.into()),
            notes: Set(input.notes),
            created_at: Set(now.into()),
        };

        let created = model
            .insert(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::OverheadConfigCreated(created.id))
            .await;

        Ok(created)
    }
}
