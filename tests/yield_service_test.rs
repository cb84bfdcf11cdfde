//! Yield test service behavior over a mocked database connection: the
//! measured yield lands on the material on create, never on edit.

use chrono::Utc;
use foodcost_api::{
    entities::{business_settings, raw_material, yield_test},
    events::{event_channel, Event},
    services::{settings::SettingsService, yield_tests::{CreateYieldTestInput, YieldTestService}},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use std::sync::Arc;

fn test_material(id: i64, yield_pct: Decimal) -> raw_material::Model {
    raw_material::Model {
        id,
        code: "BEEF".to_string(),
        name: "Beef Chuck".to_string(),
        unit: "kg".to_string(),
        category: Some("protein".to_string()),
        current_price: dec!(120),
        yield_percentage: yield_pct,
        supplier_id: None,
        notes: None,
        is_active: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn test_yield_test(id: i64, material_id: i64, yield_pct: Decimal) -> yield_test::Model {
    yield_test::Model {
        id,
        raw_material_id: material_id,
        test_date: Utc::now().into(),
        ap_weight: dec!(1000),
        ep_weight: dec!(750),
        yield_percentage: yield_pct,
        notes: None,
        created_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn create_propagates_yield_to_material() {
    let mut updated_material = test_material(1, dec!(75));
    updated_material.updated_at = Utc::now().into();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Material lookup, insert of the test, write-back onto the material
        .append_query_results(vec![vec![test_material(1, dec!(100))]])
        .append_query_results(vec![vec![test_yield_test(10, 1, dec!(75))]])
        .append_query_results(vec![vec![updated_material]])
        .into_connection();

    let (sender, mut receiver) = event_channel(16);
    let service = YieldTestService::new(Arc::new(db), Arc::new(sender));

    let created = service
        .create(CreateYieldTestInput {
            raw_material_id: 1,
            test_date: None,
            ap_weight: dec!(1000),
            ep_weight: dec!(750),
            notes: None,
        })
        .await
        .unwrap();

    assert_eq!(created.yield_percentage, dec!(75));

    let event = receiver.recv().await.unwrap();
    assert!(matches!(
        event,
        Event::YieldTestRecorded {
            material_id: 1,
            applied_to_material: true,
            ..
        }
    ));
}

#[tokio::test]
async fn material_average_assumes_lossless_without_tests() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Material lookup, then an empty test history
        .append_query_results(vec![vec![test_material(1, dec!(100))]])
        .append_query_results(vec![Vec::<yield_test::Model>::new()])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = YieldTestService::new(Arc::new(db), Arc::new(sender));

    let average = service.material_average(1).await.unwrap();

    assert_eq!(average.sample_count, 0);
    assert_eq!(average.average_yield, dec!(100));
}

#[tokio::test]
async fn labor_rate_defaults_to_zero_without_settings() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<business_settings::Model>::new()])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = SettingsService::new(Arc::new(db), Arc::new(sender));

    assert_eq!(service.current_labor_rate().await.unwrap(), Decimal::ZERO);
}
