use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::cost_standards::CreateOverheadConfigInput,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

// Request DTOs

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOverheadConfigRequest {
    /// One of percentage_labor, percentage_material, per_unit
    pub allocation_method: String,
    pub allocation_rate: Decimal,
    pub effective_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: u64,
}

fn default_history_limit() -> u64 {
    20
}

// Handler functions

/// Calculate and persist a new cost standard for a menu item
async fn calculate_standard(
    State(state): State<AppState>,
    Path(menu_item_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .services
        .cost_standards
        .calculate(menu_item_id)
        .await
        .map_err(map_service_error)?;

    info!(
        menu_item_id,
        cost_standard_id = result.cost_standard.id,
        total_cost = %result.cost_standard.total_cost,
        "Cost standard calculated"
    );

    Ok(created_response(result))
}

/// Latest cost standard for a menu item
async fn latest_standard(
    State(state): State<AppState>,
    Path(menu_item_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let standard = state
        .services
        .cost_standards
        .latest(menu_item_id)
        .await
        .map_err(map_service_error)?
        .ok_or(crate::errors::ServiceError::MissingCostStandard(
            menu_item_id,
        ))
        .map_err(map_service_error)?;

    Ok(success_response(standard))
}

/// Calculation history for a menu item, newest first
async fn standard_history(
    State(state): State<AppState>,
    Path(menu_item_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let history = state
        .services
        .cost_standards
        .history(menu_item_id, query.limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(history))
}

/// Overhead configuration currently in force
async fn current_overhead_config(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state
        .services
        .cost_standards
        .latest_overhead_config()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(config))
}

/// Record a new overhead configuration
async fn create_overhead_config(
    State(state): State<AppState>,
    Json(payload): Json<CreateOverheadConfigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let config = state
        .services
        .cost_standards
        .create_overhead_config(CreateOverheadConfigInput {
            allocation_method: payload.allocation_method,
            allocation_rate: payload.allocation_rate,
            effective_date: payload.effective_date,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;

    info!(
        overhead_config_id = config.id,
        method = %config.allocation_method,
        "Overhead configuration created"
    );

    Ok(created_response(config))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/overhead", get(current_overhead_config))
        .route("/overhead", post(create_overhead_config))
        .route("/:menu_item_id/calculate", post(calculate_standard))
        .route("/:menu_item_id", get(latest_standard))
        .route("/:menu_item_id/history", get(standard_history))
}
