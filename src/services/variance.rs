use crate::{
    costing::{self, allocate_overhead, ActualCosts, VarianceBreakdown},
    db::DbPool,
    entities::{
        production_log::Entity as ProductionLogEntity, production_log_detail,
        production_log_detail::Entity as ProductionDetailEntity, variance_record,
        variance_record::Entity as VarianceRecordEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{cost_standards::CostStandardService, settings::SettingsService},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Result of a variance analysis: the persisted record plus the full
/// per-category breakdown it was derived from.
#[derive(Debug, Clone, Serialize)]
pub struct VarianceAnalysis {
    pub variance_record: variance_record::Model,
    pub breakdown: VarianceBreakdown,
}

/// Aggregate view over a set of variance records
#[derive(Debug, Clone, Serialize)]
pub struct VarianceSummary {
    pub total_records: u64,
    pub total_variance: Decimal,
    pub average_variance_percentage: Decimal,
    pub favorable_count: u64,
    pub unfavorable_count: u64,
    pub recent: Vec<variance_record::Model>,
}

#[derive(Clone)]
pub struct VarianceService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl VarianceService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn connection(&self) -> &DbPool {
        &self.db_pool
    }

    /// Compares a production run's actual cost against the menu item's
    /// current cost standard and appends a variance record.
    ///
    /// A cost standard must exist before a run can be analyzed; the actual
    /// side is built from the run's recorded usage lines, its actual labor
    /// hours at the current labor rate, and the current overhead policy
    /// applied to the portions produced.
    #[instrument(skip(self))]
    pub async fn analyze(
        &self,
        production_log_id: i64,
    ) -> Result<VarianceAnalysis, ServiceError> {
        let db = self.connection();

        let log = ProductionLogEntity::find_by_id(production_log_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Production log {} not found", production_log_id))
            })?;

        let standards = CostStandardService::new(self.db_pool.clone(), self.event_sender.clone());
        let standard = standards
            .latest(log.menu_item_id)
            .await?
            .ok_or(ServiceError::MissingCostStandard(log.menu_item_id))?;

        let details = ProductionDetailEntity::find()
            .filter(production_log_detail::Column::ProductionLogId.eq(production_log_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let actual_material: Decimal = details.iter().map(|d| d.subtotal).sum();

        let settings = SettingsService::new(self.db_pool.clone(), self.event_sender.clone());
        let labor_rate = settings.current_labor_rate().await?;
        let actual_labor = log
            .labor_hours_actual
            .map(|hours| hours * labor_rate)
            .unwrap_or(Decimal::ZERO);

        let policy = standards.current_overhead_policy().await?;
        let actual_overhead = allocate_overhead(
            policy.as_ref(),
            actual_labor,
            actual_material,
            Decimal::from(log.portions_produced),
        );

        let actuals = ActualCosts {
            material: actual_material,
            labor: actual_labor,
            overhead: actual_overhead,
        };
        let breakdown = costing::variance(&standard, &actuals, log.portions_produced);

        let now = Utc::now();
        let record = variance_record::ActiveModel {
            id: Default::default(),
            menu_item_id: Set(log.menu_item_id),
            production_log_id: Set(production_log_id),
            variance_date: Set(log.production_date),
            standard_cost: Set(breakdown.standard_total_cost),
            actual_cost: Set(breakdown.actual_total_cost),
            variance_amount: Set(breakdown.total_variance),
            variance_percentage: Set(breakdown.variance_percentage),
            variance_type: Set("material_price".to_string()),
            notes: Set(Some(format!(
                "Variance for {} portions",
                log.portions_produced
            ))),
            created_at: Set(now.into()),
        };

        let created = record.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::VarianceRecorded {
                variance_record_id: created.id,
                production_log_id,
                total_variance: created.variance_amount,
                classification: breakdown.classification.as_str().to_string(),
            })
            .await;

        Ok(VarianceAnalysis {
            variance_record: created,
            breakdown,
        })
    }

    /// Recent variance records for a menu item, newest first.
    #[instrument(skip(self))]
    pub async fn for_menu_item(
        &self,
        menu_item_id: i64,
        limit: u64,
    ) -> Result<Vec<variance_record::Model>, ServiceError> {
        VarianceRecordEntity::find()
            .filter(variance_record::Column::MenuItemId.eq(menu_item_id))
            .order_by_desc(variance_record::Column::VarianceDate)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Aggregates variance records, optionally restricted to a date range.
    /// Favorable means the run came in under standard (negative variance).
    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<VarianceSummary, ServiceError> {
        let mut query = VarianceRecordEntity::find();
        if let Some(start) = start_date {
            query = query.filter(variance_record::Column::VarianceDate.gte(start));
        }
        if let Some(end) = end_date {
            query = query.filter(variance_record::Column::VarianceDate.lte(end));
        }

        let records = query
            .order_by_desc(variance_record::Column::VarianceDate)
            .all(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        let total_records = records.len() as u64;
        let total_variance: Decimal = records.iter().map(|r| r.variance_amount).sum();
        let average_variance_percentage = if records.is_empty() {
            Decimal::ZERO
        } else {
            records.iter().map(|r| r.variance_percentage).sum::<Decimal>()
                / Decimal::from(records.len() as u64)
        };
        let favorable_count = records
            .iter()
            .filter(|r| r.variance_amount < Decimal::ZERO)
            .count() as u64;
        let unfavorable_count = records
            .iter()
            .filter(|r| r.variance_amount > Decimal::ZERO)
            .count() as u64;

        let recent = records.into_iter().take(10).collect();

        Ok(VarianceSummary {
            total_records,
            total_variance,
            average_variance_percentage,
            favorable_count,
            unfavorable_count,
            recent,
        })
    }
}
