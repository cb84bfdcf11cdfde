pub mod common;

pub mod cost_standards;
pub mod materials;
pub mod menu_items;
pub mod production;
pub mod recipes;
pub mod reports;
pub mod settings;
pub mod suppliers;
pub mod variance;
pub mod yield_tests;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub suppliers: Arc<crate::services::suppliers::SupplierService>,
    pub materials: Arc<crate::services::materials::MaterialService>,
    pub yield_tests: Arc<crate::services::yield_tests::YieldTestService>,
    pub menu_items: Arc<crate::services::menu_items::MenuItemService>,
    pub recipes: Arc<crate::services::recipes::RecipeService>,
    pub settings: Arc<crate::services::settings::SettingsService>,
    pub cost_standards: Arc<crate::services::cost_standards::CostStandardService>,
    pub production: Arc<crate::services::production::ProductionService>,
    pub variance: Arc<crate::services::variance::VarianceService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            suppliers: Arc::new(crate::services::suppliers::SupplierService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            materials: Arc::new(crate::services::materials::MaterialService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            yield_tests: Arc::new(crate::services::yield_tests::YieldTestService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            menu_items: Arc::new(crate::services::menu_items::MenuItemService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            recipes: Arc::new(crate::services::recipes::RecipeService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            settings: Arc::new(crate::services::settings::SettingsService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            cost_standards: Arc::new(
                crate::services::cost_standards::CostStandardService::new(
                    db_pool.clone(),
                    event_sender.clone(),
                ),
            ),
            production: Arc::new(crate::services::production::ProductionService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            variance: Arc::new(crate::services::variance::VarianceService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            reports: Arc::new(crate::services::reports::ReportService::new(
                db_pool,
                event_sender,
            )),
        }
    }
}
