use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::settings::{InitSettingsInput, UpdateSettingsInput},
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

// Request DTOs

#[derive(Debug, Deserialize, Validate)]
pub struct InitSettingsRequest {
    #[validate(length(min = 1, max = 255))]
    pub business_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub labor_rate_per_hour: Decimal,
    /// ISO 4217 code; defaults to USD
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, max = 255))]
    pub business_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub labor_rate_per_hour: Option<Decimal>,
    pub currency: Option<String>,
}

// Handler functions

/// One-time setup of business settings
async fn init_settings(
    State(state): State<AppState>,
    Json(payload): Json<InitSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let settings = state
        .services
        .settings
        .init(InitSettingsInput {
            business_name: payload.business_name,
            address: payload.address,
            phone: payload.phone,
            email: payload.email,
            labor_rate_per_hour: payload.labor_rate_per_hour,
            currency: payload.currency,
        })
        .await
        .map_err(map_service_error)?;

    info!("Business settings initialized");

    Ok(created_response(settings))
}

/// Current business settings
async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let settings = state
        .services
        .settings
        .get()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(settings))
}

/// Whether setup has been completed
async fn settings_status(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let status = state
        .services
        .settings
        .status()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(status))
}

/// Update business settings
async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let settings = state
        .services
        .settings
        .update(UpdateSettingsInput {
            business_name: payload.business_name,
            address: payload.address,
            phone: payload.phone,
            email: payload.email,
            labor_rate_per_hour: payload.labor_rate_per_hour,
            currency: payload.currency,
        })
        .await
        .map_err(map_service_error)?;

    info!("Business settings updated");

    Ok(success_response(settings))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings))
        .route("/", put(update_settings))
        .route("/init", post(init_settings))
        .route("/status", get(settings_status))
}
