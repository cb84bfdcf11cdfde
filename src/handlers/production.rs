use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::production::{
        AddProductionDetailInput, CreateProductionLogInput, ProductionLogFilter,
        UpdateProductionDetailInput, UpdateProductionLogInput,
    },
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

// Request DTOs

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductionLogRequest {
    pub menu_item_id: i64,
    pub production_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub portions_produced: i32,
    pub portions_sold: Option<i32>,
    pub labor_hours_actual: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductionLogRequest {
    pub production_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub portions_produced: Option<i32>,
    #[serde(default, deserialize_with = "super::common::double_option")]
    pub portions_sold: Option<Option<i32>>,
    #[serde(default, deserialize_with = "super::common::double_option")]
    pub labor_hours_actual: Option<Option<Decimal>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddProductionDetailRequest {
    pub raw_material_id: i64,
    pub quantity_used: Decimal,
    pub unit: Option<String>,
    /// Defaults to the material's current price when omitted
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductionDetailRequest {
    pub quantity_used: Option<Decimal>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct ProductionListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub menu_item_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

// Handler functions

/// Log a production run
async fn create_log(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductionLogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let log = state
        .services
        .production
        .create(CreateProductionLogInput {
            menu_item_id: payload.menu_item_id,
            production_date: payload.production_date,
            portions_produced: payload.portions_produced,
            portions_sold: payload.portions_sold,
            labor_hours_actual: payload.labor_hours_actual,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;

    info!(
        production_log_id = log.id,
        menu_item_id = log.menu_item_id,
        portions = log.portions_produced,
        "Production logged"
    );

    Ok(created_response(log))
}

/// Get a production run with its usage lines
async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .services
        .production
        .get(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(view))
}

/// List production runs, newest first
async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<ProductionListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ProductionLogFilter {
        menu_item_id: query.menu_item_id,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let (logs, total) = state
        .services
        .production
        .list(filter, query.pagination.page, query.pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        logs,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Amend a production run
async fn update_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductionLogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let log = state
        .services
        .production
        .update(
            id,
            UpdateProductionLogInput {
                production_date: payload.production_date,
                portions_produced: payload.portions_produced,
                portions_sold: payload.portions_sold,
                labor_hours_actual: payload.labor_hours_actual,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(production_log_id = id, "Production log updated");

    Ok(success_response(log))
}

/// Delete a production run and its usage lines
async fn delete_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .production
        .delete(id)
        .await
        .map_err(map_service_error)?;

    info!(production_log_id = id, "Production log deleted");

    Ok(no_content_response())
}

/// Record material usage against a production run
async fn add_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AddProductionDetailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let detail = state
        .services
        .production
        .add_detail(
            id,
            AddProductionDetailInput {
                raw_material_id: payload.raw_material_id,
                quantity_used: payload.quantity_used,
                unit: payload.unit,
                unit_price: payload.unit_price,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(
        production_log_id = id,
        detail_id = detail.id,
        subtotal = %detail.subtotal,
        "Production detail added"
    );

    Ok(created_response(detail))
}

/// Correct a usage line; the subtotal is recomputed
async fn update_detail(
    State(state): State<AppState>,
    Path(detail_id): Path<i64>,
    Json(payload): Json<UpdateProductionDetailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let detail = state
        .services
        .production
        .update_detail(
            detail_id,
            UpdateProductionDetailInput {
                quantity_used: payload.quantity_used,
                unit: payload.unit,
                unit_price: payload.unit_price,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(detail_id, "Production detail updated");

    Ok(success_response(detail))
}

/// Remove a usage line
async fn remove_detail(
    State(state): State<AppState>,
    Path(detail_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .production
        .remove_detail(detail_id)
        .await
        .map_err(map_service_error)?;

    info!(detail_id, "Production detail removed");

    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_log))
        .route("/", get(list_logs))
        .route("/details/:detail_id", put(update_detail))
        .route("/details/:detail_id", delete(remove_detail))
        .route("/:id", get(get_log))
        .route("/:id", put(update_log))
        .route("/:id", delete(delete_log))
        .route("/:id/details", post(add_detail))
}
