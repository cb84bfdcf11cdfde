use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::yield_tests::{CreateYieldTestInput, UpdateYieldTestInput},
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
pub struct CreateYieldTestRequest {
    pub raw_material_id: i64,
    pub test_date: Option<DateTime<Utc>>,
    /// As-purchased weight, before trimming
    pub ap_weight: Decimal,
    /// Edible-portion weight, after trimming
    pub ep_weight: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateYieldTestRequest {
    pub test_date: Option<DateTime<Utc>>,
    pub ap_weight: Option<Decimal>,
    pub ep_weight: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YieldTestListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub raw_material_id: Option<i64>,
}

// Handler functions

/// Record a yield test; the result becomes the material's current yield
async fn create_yield_test(
    State(state): State<AppState>,
    Json(payload): Json<CreateYieldTestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let test = state
        .services
        .yield_tests
        .create(CreateYieldTestInput {
            raw_material_id: payload.raw_material_id,
            test_date: payload.test_date,
            ap_weight: payload.ap_weight,
            ep_weight: payload.ep_weight,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;

    info!(
        yield_test_id = test.id,
        material_id = test.raw_material_id,
        yield_percentage = %test.yield_percentage,
        "Yield test recorded"
    );

    Ok(created_response(test))
}

/// Get a yield test by ID
async fn get_yield_test(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let test = state
        .services
        .yield_tests
        .get(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(test))
}

/// List yield tests, optionally for one material, newest first
async fn list_yield_tests(
    State(state): State<AppState>,
    Query(query): Query<YieldTestListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (tests, total) = state
        .services
        .yield_tests
        .list(
            query.raw_material_id,
            query.pagination.page,
            query.pagination.per_page,
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        tests,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Average yield across a material's recent tests
async fn material_average(
    State(state): State<AppState>,
    Path(material_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let average = state
        .services
        .yield_tests
        .material_average(material_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(average))
}

/// Correct a yield test; does not touch the material's current yield
async fn update_yield_test(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateYieldTestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let test = state
        .services
        .yield_tests
        .update(
            id,
            UpdateYieldTestInput {
                test_date: payload.test_date,
                ap_weight: payload.ap_weight,
                ep_weight: payload.ep_weight,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(yield_test_id = id, "Yield test updated");

    Ok(success_response(test))
}

/// Delete a yield test
async fn delete_yield_test(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .yield_tests
        .delete(id)
        .await
        .map_err(map_service_error)?;

    info!(yield_test_id = id, "Yield test deleted");

    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_yield_test))
        .route("/", get(list_yield_tests))
        .route("/material/:material_id/average", get(material_average))
        .route("/:id", get(get_yield_test))
        .route("/:id", put(update_yield_test))
        .route("/:id", delete(delete_yield_test))
}
