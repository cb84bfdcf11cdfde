use super::common::{created_response, map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: u64,
}

fn default_recent_limit() -> u64 {
    20
}

// Handler functions

/// Analyze a production run against its menu item's current cost standard
async fn analyze_production_log(
    State(state): State<AppState>,
    Path(production_log_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let analysis = state
        .services
        .variance
        .analyze(production_log_id)
        .await
        .map_err(map_service_error)?;

    info!(
        production_log_id,
        variance_record_id = analysis.variance_record.id,
        variance = %analysis.variance_record.variance_amount,
        classification = analysis.breakdown.classification.as_str(),
        "Variance analyzed"
    );

    Ok(created_response(analysis))
}

/// Recent variance records for a menu item
async fn menu_item_variances(
    State(state): State<AppState>,
    Path(menu_item_id): Path<i64>,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .services
        .variance
        .for_menu_item(menu_item_id, query.limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(records))
}

/// Aggregate variance figures, optionally over a date range
async fn variance_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .variance
        .summary(query.start_date, query.end_date)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(summary))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(variance_summary))
        .route(
            "/production-log/:production_log_id",
            post(analyze_production_log),
        )
        .route("/menu-item/:menu_item_id", get(menu_item_variances))
}
