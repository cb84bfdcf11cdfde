//! Variance service tests over a mocked database connection.

use chrono::Utc;
use foodcost_api::{
    costing::VarianceClass,
    entities::{business_settings, cost_standard, production_log, production_log_detail, variance_record},
    errors::ServiceError,
    events::event_channel,
    services::variance::VarianceService,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use std::sync::Arc;

fn test_log(id: i64, menu_item_id: i64, portions: i32) -> production_log::Model {
    production_log::Model {
        id,
        menu_item_id,
        production_date: Utc::now().into(),
        portions_produced: portions,
        portions_sold: Some(portions),
        labor_hours_actual: Some(dec!(2)),
        notes: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn test_standard(menu_item_id: i64) -> cost_standard::Model {
    cost_standard::Model {
        id: 7,
        menu_item_id,
        effective_date: Utc::now().into(),
        material_cost: dec!(50),
        labor_cost: dec!(20),
        overhead_cost: dec!(10),
        total_cost: dec!(80),
        cost_per_portion: dec!(8),
        created_at: Utc::now().into(),
    }
}

fn test_detail(id: i64, log_id: i64, subtotal: Decimal) -> production_log_detail::Model {
    production_log_detail::Model {
        id,
        production_log_id: log_id,
        raw_material_id: id,
        quantity_used: dec!(1),
        unit: "kg".to_string(),
        unit_price: subtotal,
        subtotal,
        created_at: Utc::now().into(),
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

#[tokio::test]
async fn analyze_requires_a_cost_standard() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![test_log(1, 42, 10)]])
        .append_query_results(vec![Vec::<cost_standard::Model>::new()])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = VarianceService::new(Arc::new(db), Arc::new(sender));

    let err = service.analyze(1).await.unwrap_err();
    assert!(matches!(err, ServiceError::MissingCostStandard(42)));
}

#[tokio::test]
async fn analyze_missing_log_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<production_log::Model>::new()])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = VarianceService::new(Arc::new(db), Arc::new(sender));

    let err = service.analyze(99).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn analyze_classifies_over_spend_as_unfavorable() {
    // Standard: 8 per portion * 10 portions = 80.
    // Actuals: material 55 from usage lines, labor 2h * 15 = 30, no overhead
    // policy. Total 85 against 80 is a +5 unfavorable variance.
    let expected_record = variance_record::Model {
        id: 1,
        menu_item_id: 42,
        production_log_id: 1,
        variance_date: Utc::now().into(),
        standard_cost: dec!(80),
        actual_cost: dec!(85),
        variance_amount: dec!(5),
        variance_percentage: dec!(6.25),
        variance_type: "material_price".to_string(),
        notes: Some("Variance for 10 portions".to_string()),
        created_at: Utc::now().into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![test_log(1, 42, 10)]])
        .append_query_results(vec![vec![test_standard(42)]])
        .append_query_results(vec![vec![
            test_detail(1, 1, dec!(30)),
            test_detail(2, 1, dec!(25)),
        ]])
        .append_query_results(vec![vec![test_settings(dec!(15))]])
        .append_query_results(vec![Vec::<foodcost_api::entities::overhead_config::Model>::new()])
        .append_query_results(vec![vec![expected_record]])
        .into_connection();

    let (sender, mut receiver) = event_channel(16);
    let service = VarianceService::new(Arc::new(db), Arc::new(sender));

    let analysis = service.analyze(1).await.unwrap();

    assert_eq!(analysis.breakdown.standard_total_cost, dec!(80));
    assert_eq!(analysis.breakdown.actual_total_cost, dec!(85));
    assert_eq!(analysis.breakdown.total_variance, dec!(5));
    assert_eq!(analysis.breakdown.variance_percentage, dec!(6.25));
    assert_eq!(analysis.breakdown.classification, VarianceClass::Unfavorable);
    // Actual labor came from hours * current rate
    assert_eq!(analysis.breakdown.labor.actual, dec!(30));
    assert_eq!(analysis.variance_record.variance_amount, dec!(5));

    let event = receiver.recv().await.unwrap();
    assert!(matches!(
        event,
        foodcost_api::events::Event::VarianceRecorded { production_log_id: 1, .. }
    ));
}
