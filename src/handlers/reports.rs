use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub month: u32,
    pub year: i32,
}

// Handler functions

/// Profitability by menu item over a date range
async fn profitability(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .profitability(query.start_date, query.end_date)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(rows))
}

/// Cost standard history for a menu item, averaged per day
async fn cost_trends(
    State(state): State<AppState>,
    Path(menu_item_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let points = state
        .services
        .reports
        .cost_trends(menu_item_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(points))
}

/// Revenue and cost rollup for one calendar month
async fn monthly_summary(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .reports
        .monthly_summary(query.month, query.year)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(summary))
}

/// Headline counts and recent variance activity
async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .services
        .reports
        .dashboard()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(snapshot))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profitability", get(profitability))
        .route("/cost-trends/:menu_item_id", get(cost_trends))
        .route("/monthly-summary", get(monthly_summary))
        .route("/dashboard", get(dashboard))
}
