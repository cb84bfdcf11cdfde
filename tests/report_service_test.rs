//! Profitability report behavior over a mocked database connection: only
//! zero-sold items drop out of the report; a missing cost standard or
//! price is reported as zero, not hidden.

use chrono::Utc;
use foodcost_api::{
    entities::{cost_standard, menu_item, menu_pricing, production_log},
    events::event_channel,
    services::reports::ReportService,
};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use std::sync::Arc;

fn test_menu_item(id: i64) -> menu_item::Model {
    menu_item::Model {
        id,
        code: format!("MI-{:03}", id),
        name: "Beef Rendang".to_string(),
        category: Some("Main".to_string()),
        standard_portion: 10,
        standard_portion_unit: "portion".to_string(),
        standard_labor_hours: dec!(2),
        is_active: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn test_log(id: i64, menu_item_id: i64, portions_sold: Option<i32>) -> production_log::Model {
    production_log::Model {
        id,
        menu_item_id,
        production_date: Utc::now().into(),
        portions_produced: 20,
        portions_sold,
        labor_hours_actual: None,
        notes: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn unpriced_items_with_sales_still_appear() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Active items, then per item: latest standard, latest price, logs
        .append_query_results(vec![vec![test_menu_item(1)]])
        .append_query_results(vec![Vec::<cost_standard::Model>::new()])
        .append_query_results(vec![Vec::<menu_pricing::Model>::new()])
        .append_query_results(vec![vec![test_log(5, 1, Some(12))]])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = ReportService::new(Arc::new(db), Arc::new(sender));

    let rows = service.profitability(None, None).await.unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.menu_item_id, 1);
    assert_eq!(row.total_sold, 12);
    assert_eq!(row.selling_price, dec!(0));
    assert_eq!(row.cost_per_portion, dec!(0));
    assert_eq!(row.total_revenue, dec!(0));
    assert_eq!(row.total_profit, dec!(0));
}

#[tokio::test]
async fn items_without_sales_are_omitted() {
    let standard = cost_standard::Model {
        id: 1,
        menu_item_id: 1,
        effective_date: Utc::now().into(),
        material_cost: dec!(60),
        labor_cost: dec!(30),
        overhead_cost: dec!(10),
        total_cost: dec!(100),
        cost_per_portion: dec!(10),
        created_at: Utc::now().into(),
    };
    let pricing = menu_pricing::Model {
        id: 1,
        menu_item_id: 1,
        selling_price: dec!(25),
        effective_date: Utc::now().into(),
        notes: None,
        created_at: Utc::now().into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![test_menu_item(1)]])
        .append_query_results(vec![vec![standard]])
        .append_query_results(vec![vec![pricing]])
        .append_query_results(vec![vec![test_log(5, 1, None)]])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = ReportService::new(Arc::new(db), Arc::new(sender));

    let rows = service.profitability(None, None).await.unwrap();

    assert!(rows.is_empty());
}
