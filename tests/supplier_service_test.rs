//! Supplier service tests over a mocked database connection, covering the
//! two-step delete policy.

use chrono::Utc;
use foodcost_api::{
    entities::supplier,
    errors::ServiceError,
    events::event_channel,
    services::suppliers::{DeleteOutcome, SupplierService},
};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

fn test_supplier(id: i64, name: &str) -> supplier::Model {
    supplier::Model {
        id,
        name: name.to_string(),
        contact_person: None,
        phone: None,
        email: None,
        address: None,
        payment_terms: Some("net 30".to_string()),
        notes: None,
        is_active: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
}

#[tokio::test]
async fn get_missing_supplier_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<supplier::Model>::new()])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = SupplierService::new(Arc::new(db), Arc::new(sender));

    let err = service.get(5).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn delete_with_dependent_materials_deactivates() {
    let mut deactivated = test_supplier(3, "Valley Produce");
    deactivated.is_active = false;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![test_supplier(3, "Valley Produce")]])
        .append_query_results(vec![vec![count_row(2)]])
        .append_query_results(vec![vec![deactivated]])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = SupplierService::new(Arc::new(db), Arc::new(sender));

    let outcome = service.delete(3).await.unwrap();
    assert!(matches!(
        outcome,
        DeleteOutcome::Deactivated { dependent_count: 2 }
    ));
}

#[tokio::test]
async fn delete_without_dependents_removes_the_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![test_supplier(4, "Harbor Fish Co")]])
        .append_query_results(vec![vec![count_row(0)]])
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let (sender, _receiver) = event_channel(16);
    let service = SupplierService::new(Arc::new(db), Arc::new(sender));

    let outcome = service.delete(4).await.unwrap();
    assert!(matches!(outcome, DeleteOutcome::Deleted));
}
