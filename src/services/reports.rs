use crate::{
    costing::{round_money, OverheadMethod},
    db::DbPool,
    entities::{
        cost_standard, cost_standard::Entity as CostStandardEntity, menu_item,
        menu_item::Entity as MenuItemEntity, menu_pricing,
        menu_pricing::Entity as MenuPricingEntity, production_log,
        production_log::Entity as ProductionLogEntity, production_log_detail,
        production_log_detail::Entity as ProductionDetailEntity, raw_material,
        raw_material::Entity as RawMaterialEntity, supplier,
        supplier::Entity as SupplierEntity, variance_record,
        variance_record::Entity as VarianceRecordEntity,
    },
    errors::ServiceError,
    events::EventSender,
    services::{cost_standards::CostStandardService, settings::SettingsService},
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

/// Per-item profitability over a date range
#[derive(Debug, Clone, Serialize)]
pub struct ProfitabilityRow {
    pub menu_item_id: i64,
    pub code: String,
    pub name: String,
    pub selling_price: Decimal,
    pub cost_per_portion: Decimal,
    pub margin: Decimal,
    pub margin_percentage: Decimal,
    pub total_sold: i64,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
}

/// One point on a menu item's cost history, averaged per calendar day
#[derive(Debug, Clone, Serialize)]
pub struct CostTrendPoint {
    pub date: NaiveDate,
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub overhead_cost: Decimal,
    pub total_cost: Decimal,
    pub cost_per_portion: Decimal,
    pub record_count: u64,
}

/// Month-level rollup of revenue against cost categories
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    pub total_revenue: Decimal,
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub overhead_cost: Decimal,
    pub food_cost_percentage: Decimal,
    pub labor_cost_percentage: Decimal,
    pub overhead_cost_percentage: Decimal,
    pub net_profit: Decimal,
    pub profit_margin: Decimal,
    pub production_count: u64,
}

/// Headline numbers for the landing dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub active_suppliers: u64,
    pub active_materials: u64,
    pub active_menu_items: u64,
    pub production_runs_last_7_days: u64,
    pub recent_variances: Vec<variance_record::Model>,
    pub average_variance_percentage: Decimal,
}

#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn connection(&self) -> &DbPool {
        &self.db_pool
    }

    /// Profitability by menu item: current price against current standard,
    /// scaled by portions sold in the range. Items with no sales are
    /// omitted; a missing standard or price counts as zero so loss-making
    /// items still show up. Sorted by total profit, best first.
    #[instrument(skip(self))]
    pub async fn profitability(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<ProfitabilityRow>, ServiceError> {
        let db = self.connection();

        let items = MenuItemEntity::find()
            .filter(menu_item::Column::IsActive.eq(true))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut rows = Vec::new();
        for item in items {
            let standard = CostStandardEntity::find()
                .filter(cost_standard::Column::MenuItemId.eq(item.id))
                .order_by_desc(cost_standard::Column::EffectiveDate)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;

            let pricing = MenuPricingEntity::find()
                .filter(menu_pricing::Column::MenuItemId.eq(item.id))
                .order_by_desc(menu_pricing::Column::EffectiveDate)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;

            let mut logs = ProductionLogEntity::find()
                .filter(production_log::Column::MenuItemId.eq(item.id));
            if let Some(start) = start_date {
                logs = logs.filter(production_log::Column::ProductionDate.gte(start));
            }
            if let Some(end) = end_date {
                logs = logs.filter(production_log::Column::ProductionDate.lte(end));
            }
            let logs = logs.all(db).await.map_err(ServiceError::db_error)?;

            let total_sold: i64 = logs
                .iter()
                .map(|l| i64::from(l.portions_sold.unwrap_or(0)))
                .sum();
            if total_sold <= 0 {
                continue;
            }

            let price = pricing
                .map(|p| p.selling_price)
                .unwrap_or(Decimal::ZERO);
            let cost = standard
                .map(|s| s.cost_per_portion)
                .unwrap_or(Decimal::ZERO);
            let margin = price - cost;
            let margin_percentage = if price > Decimal::ZERO {
                margin / price * Decimal::from(100)
            } else {
                Decimal::ZERO
            };
            let sold = Decimal::from(total_sold);

            rows.push(ProfitabilityRow {
                menu_item_id: item.id,
                code: item.code,
                name: item.name,
                selling_price: round_money(price),
                cost_per_portion: round_money(cost),
                margin: round_money(margin),
                margin_percentage: round_money(margin_percentage),
                total_sold,
                total_revenue: round_money(price * sold),
                total_cost: round_money(cost * sold),
                total_profit: round_money(margin * sold),
            });
        }

        rows.sort_by(|a, b| b.total_profit.cmp(&a.total_profit));
        Ok(rows)
    }

    /// Cost standard history for a menu item, averaged per effective day.
    #[instrument(skip(self))]
    pub async fn cost_trends(
        &self,
        menu_item_id: i64,
    ) -> Result<Vec<CostTrendPoint>, ServiceError> {
        let db = self.connection();

        MenuItemEntity::find_by_id(menu_item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Menu item {} not found", menu_item_id))
            })?;

        let standards = CostStandardEntity::find()
            .filter(cost_standard::Column::MenuItemId.eq(menu_item_id))
            .order_by_asc(cost_standard::Column::EffectiveDate)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut by_day: BTreeMap<NaiveDate, Vec<cost_standard::Model>> = BTreeMap::new();
        for standard in standards {
            by_day
                .entry(standard.effective_date.date_naive())
                .or_default()
                .push(standard);
        }

        let points = by_day
            .into_iter()
            .map(|(date, group)| {
                let count = Decimal::from(group.len() as u64);
                let avg = |f: fn(&cost_standard::Model) -> Decimal| {
                    round_money(group.iter().map(f).sum::<Decimal>() / count)
                };
                CostTrendPoint {
                    date,
                    material_cost: avg(|s| s.material_cost),
                    labor_cost: avg(|s| s.labor_cost),
                    overhead_cost: avg(|s| s.overhead_cost),
                    total_cost: avg(|s| s.total_cost),
                    cost_per_portion: avg(|s| s.cost_per_portion),
                    record_count: group.len() as u64,
                }
            })
            .collect();

        Ok(points)
    }

    /// Revenue and cost categories rolled up over one calendar month.
    ///
    /// Per-unit overhead configurations do not apply to month-level
    /// aggregates; only the percentage methods contribute here.
    #[instrument(skip(self))]
    pub async fn monthly_summary(
        &self,
        month: u32,
        year: i32,
    ) -> Result<MonthlySummary, ServiceError> {
        if !(1..=12).contains(&month) {
            return Err(ServiceError::InvalidInput(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }

        let db = self.connection();
        let start = Utc
            .with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("Invalid month {}/{}", month, year))
            })?;
        let end = if month == 12 {
            Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
        } else {
            Utc.with_ymd_and_hms(year, month + 1, 1, 0, 0, 0)
        }
        .single()
        .ok_or_else(|| ServiceError::InvalidInput(format!("Invalid month {}/{}", month, year)))?;

        let logs = ProductionLogEntity::find()
            .filter(production_log::Column::ProductionDate.gte(start))
            .filter(production_log::Column::ProductionDate.lt(end))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let settings = SettingsService::new(self.db_pool.clone(), self.event_sender.clone());
        let labor_rate = settings.current_labor_rate().await?;

        let mut total_revenue = Decimal::ZERO;
        let mut material_cost = Decimal::ZERO;
        let mut labor_cost = Decimal::ZERO;

        for log in &logs {
            if let Some(sold) = log.portions_sold {
                let price = MenuPricingEntity::find()
                    .filter(menu_pricing::Column::MenuItemId.eq(log.menu_item_id))
                    .order_by_desc(menu_pricing::Column::EffectiveDate)
                    .one(db)
                    .await
                    .map_err(ServiceError::db_error)?
                    .map(|p| p.selling_price)
                    .unwrap_or(Decimal::ZERO);
                total_revenue += price * Decimal::from(sold);
            }

            let details = ProductionDetailEntity::find()
                .filter(production_log_detail::Column::ProductionLogId.eq(log.id))
                .all(db)
                .await
                .map_err(ServiceError::db_error)?;
            material_cost += details.iter().map(|d| d.subtotal).sum::<Decimal>();

            if let Some(hours) = log.labor_hours_actual {
                labor_cost += hours * labor_rate;
            }
        }

        let standards = CostStandardService::new(self.db_pool.clone(), self.event_sender.clone());
        let overhead_cost = match standards.current_overhead_policy().await? {
            Some(policy) => match policy.method {
                OverheadMethod::PercentageLabor => labor_cost * (policy.rate / Decimal::from(100)),
                OverheadMethod::PercentageMaterial => {
                    material_cost * (policy.rate / Decimal::from(100))
                }
                OverheadMethod::PerUnit => Decimal::ZERO,
            },
            None => Decimal::ZERO,
        };

        let pct_of_revenue = |cost: Decimal| {
            if total_revenue > Decimal::ZERO {
                round_money(cost / total_revenue * Decimal::from(100))
            } else {
                Decimal::ZERO
            }
        };

        let net_profit = total_revenue - material_cost - labor_cost - overhead_cost;

        Ok(MonthlySummary {
            month,
            year,
            total_revenue: round_money(total_revenue),
            material_cost: round_money(material_cost),
            labor_cost: round_money(labor_cost),
            overhead_cost: round_money(overhead_cost),
            food_cost_percentage: pct_of_revenue(material_cost),
            labor_cost_percentage: pct_of_revenue(labor_cost),
            overhead_cost_percentage: pct_of_revenue(overhead_cost),
            net_profit: round_money(net_profit),
            profit_margin: pct_of_revenue(net_profit),
            production_count: logs.len() as u64,
        })
    }

    /// Counts and recent variance activity for the landing dashboard.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardSnapshot, ServiceError> {
        let db = self.connection();

        let active_suppliers = SupplierEntity::find()
            .filter(supplier::Column::IsActive.eq(true))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        let active_materials = RawMaterialEntity::find()
            .filter(raw_material::Column::IsActive.eq(true))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        let active_menu_items = MenuItemEntity::find()
            .filter(menu_item::Column::IsActive.eq(true))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let week_ago = Utc::now() - Duration::days(7);
        let production_runs_last_7_days = ProductionLogEntity::find()
            .filter(production_log::Column::ProductionDate.gte(week_ago))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let recent_variances = VarianceRecordEntity::find()
            .order_by_desc(variance_record::Column::VarianceDate)
            .limit(10)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let average_variance_percentage = if recent_variances.is_empty() {
            Decimal::ZERO
        } else {
            round_money(
                recent_variances
                    .iter()
                    .map(|v| v.variance_percentage)
                    .sum::<Decimal>()
                    / Decimal::from(recent_variances.len() as u64),
            )
        };

        Ok(DashboardSnapshot {
            active_suppliers,
            active_materials,
            active_menu_items,
            production_runs_last_7_days,
            recent_variances,
            average_variance_percentage,
        })
    }
}
