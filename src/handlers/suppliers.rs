use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::suppliers::{CreateSupplierInput, SupplierFilter, UpdateSupplierInput},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

// Request DTOs

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

// Handler functions

/// Create a new supplier
async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .create(CreateSupplierInput {
            name: payload.name,
            contact_person: payload.contact_person,
            phone: payload.phone,
            email: payload.email,
            address: payload.address,
            payment_terms: payload.payment_terms,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;

    info!(supplier_id = supplier.id, "Supplier created");

    Ok(created_response(supplier))
}

/// Get a supplier by ID
async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .get(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(supplier))
}

/// List suppliers with optional search and active filters
async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<SupplierListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = SupplierFilter {
        search: query.search,
        is_active: query.is_active,
    };

    let (suppliers, total) = state
        .services
        .suppliers
        .list(filter, query.pagination.page, query.pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        suppliers,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Update a supplier
async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .update(
            id,
            UpdateSupplierInput {
                name: payload.name,
                contact_person: payload.contact_person,
                phone: payload.phone,
                email: payload.email,
                address: payload.address,
                payment_terms: payload.payment_terms,
                notes: payload.notes,
                is_active: payload.is_active,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(supplier_id = id, "Supplier updated");

    Ok(success_response(supplier))
}

/// Delete a supplier; deactivates instead when materials reference it
async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .services
        .suppliers
        .delete(id)
        .await
        .map_err(map_service_error)?;

    info!(supplier_id = id, ?outcome, "Supplier delete processed");

    match outcome {
        crate::services::suppliers::DeleteOutcome::Deleted => Ok(no_content_response()),
        deactivated => Ok(success_response(deactivated)),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_supplier))
        .route("/", get(list_suppliers))
        .route("/:id", get(get_supplier))
        .route("/:id", put(update_supplier))
        .route("/:id", delete(delete_supplier))
}
