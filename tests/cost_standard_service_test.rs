//! Cost standard service tests over a mocked database connection.

use chrono::Utc;
use foodcost_api::{
    entities::{
        business_settings, cost_standard, menu_item, overhead_config, raw_material, recipe_detail,
    },
    errors::ServiceError,
    events::{event_channel, Event},
    services::cost_standards::CostStandardService,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use std::sync::Arc;

fn test_item(id: i64) -> menu_item::Model {
    menu_item::Model {
        id,
        code: "MI-001".to_string(),
        name: "Pork Belly Bao".to_string(),
        category: Some("mains".to_string()),
        standard_portion: 10,
        standard_portion_unit: "portion".to_string(),
        standard_labor_hours: dec!(2),
        is_active: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn test_detail(id: i64, menu_item_id: i64, material_id: i64, quantity: Decimal) -> recipe_detail::Model {
    recipe_detail::Model {
        id,
        menu_item_id,
        raw_material_id: material_id,
        quantity,
        unit: "kg".to_string(),
        sequence: Some(1),
        notes: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn test_material(id: i64, price: Decimal, yield_pct: Decimal) -> raw_material::Model {
    raw_material::Model {
        id,
        code: format!("RM-{}", id),
        name: format!("Material {}", id),
        unit: "kg".to_string(),
        category: None,
        current_price: price,
        yield_percentage: yield_pct,
        supplier_id: None,
        notes: None,
        is_active: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn test_settings(labor_rate: Decimal) -> business_settings::Model {
    business_settings::Model {
        id: 1,
        business_name: "Test Kitchen".to_string(),
        address: None,
        phone: None,
        email: None,
        labor_rate_per_hour: labor_rate,
        currency: "USD".to_string(),
        is_initialized: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn test_overhead(method: &str, rate: Decimal) -> overhead_config::Model {
    overhead_config::Model {
        id: 1,
        allocation_method: method.to_string(),
        allocation_rate: rate,
        effective_date: Utc::now().into(),
        notes: None,
        created_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn calculate_appends_a_snapshot_with_engine_figures() {
    // 5 kg at 10000/kg trimming to 80% -> material 62500.
    // 2 h at 50000/h -> labor 100000. 20% of labor -> overhead 20000.
    let expected_snapshot = cost_standard::Model {
        id: 1,
        menu_item_id: 1,
        effective_date: Utc::now().into(),
        material_cost: dec!(62500),
        labor_cost: dec!(100000),
        overhead_cost: dec!(20000),
        total_cost: dec!(182500),
        cost_per_portion: dec!(18250),
        created_at: Utc::now().into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![test_item(1)]])
        .append_query_results(vec![vec![test_detail(1, 1, 7, dec!(5))]])
        .append_query_results(vec![vec![test_material(7, dec!(10000), dec!(80))]])
        .append_query_results(vec![vec![test_settings(dec!(50000))]])
        .append_query_results(vec![vec![test_overhead("percentage_labor", dec!(20))]])
        .append_query_results(vec![vec![expected_snapshot]])
        .into_connection();

    let (sender, mut receiver) = event_channel(16);
    let service = CostStandardService::new(Arc::new(db), Arc::new(sender));

    let result = service.calculate(1).await.unwrap();

    assert_eq!(result.breakdown.material_cost, dec!(62500));
    assert_eq!(result.breakdown.labor_cost, dec!(100000));
    assert_eq!(result.breakdown.overhead_cost, dec!(20000));
    assert_eq!(result.breakdown.total_cost, dec!(182500));
    assert_eq!(result.breakdown.cost_per_portion, dec!(18250));
    assert_eq!(result.cost_standard.total_cost, dec!(182500));

    let event = receiver.recv().await.unwrap();
    assert!(matches!(
        event,
        Event::CostStandardCalculated { menu_item_id: 1, .. }
    ));
}

#[tokio::test]
async fn calculate_rejects_zero_yield_materials() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![test_item(1)]])
        .append_query_results(vec![vec![test_detail(1, 1, 7, dec!(5))]])
        .append_query_results(vec![vec![test_material(7, dec!(10000), Decimal::ZERO)]])
        .append_query_results(vec![vec![test_settings(dec!(50000))]])
        .append_query_results(vec![Vec::<overhead_config::Model>::new()])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = CostStandardService::new(Arc::new(db), Arc::new(sender));

    let err = service.calculate(1).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidMaterialYield { material_id: 7, .. }
    ));
}

#[tokio::test]
async fn calculate_missing_item_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<menu_item::Model>::new()])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = CostStandardService::new(Arc::new(db), Arc::new(sender));

    let err = service.calculate(99).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
