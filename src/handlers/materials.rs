use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::materials::{CreateMaterialInput, MaterialFilter, UpdateMaterialInput},
    services::suppliers::DeleteOutcome,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

// Request DTOs

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub unit: String,
    pub category: Option<String>,
    pub current_price: Decimal,
    /// Percentage 0-100; omitted means no trim loss
    pub yield_percentage: Option<Decimal>,
    pub supplier_id: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMaterialRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub unit: Option<String>,
    pub category: Option<String>,
    pub current_price: Option<Decimal>,
    pub yield_percentage: Option<Decimal>,
    /// Present-and-null clears the supplier link
    #[serde(default, deserialize_with = "super::common::double_option")]
    pub supplier_id: Option<Option<i64>>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MaterialListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub search: Option<String>,
    pub category: Option<String>,
    pub supplier_id: Option<i64>,
    pub is_active: Option<bool>,
}

// Handler functions

/// Create a raw material
async fn create_material(
    State(state): State<AppState>,
    Json(payload): Json<CreateMaterialRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let material = state
        .services
        .materials
        .create(CreateMaterialInput {
            code: payload.code,
            name: payload.name,
            unit: payload.unit,
            category: payload.category,
            current_price: payload.current_price,
            yield_percentage: payload.yield_percentage,
            supplier_id: payload.supplier_id,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;

    info!(material_id = material.id, code = %material.code, "Material created");

    Ok(created_response(material))
}

/// Get a material with its supplier name
async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .services
        .materials
        .get_with_supplier(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(view))
}

/// List materials with search and filters
async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<MaterialListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = MaterialFilter {
        search: query.search,
        category: query.category,
        supplier_id: query.supplier_id,
        is_active: query.is_active,
    };

    let (materials, total) = state
        .services
        .materials
        .list(filter, query.pagination.page, query.pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        materials,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Distinct material categories for filter dropdowns
async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .materials
        .categories()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(categories))
}

/// Update a material
async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMaterialRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let material = state
        .services
        .materials
        .update(
            id,
            UpdateMaterialInput {
                name: payload.name,
                unit: payload.unit,
                category: payload.category,
                current_price: payload.current_price,
                yield_percentage: payload.yield_percentage,
                supplier_id: payload.supplier_id,
                notes: payload.notes,
                is_active: payload.is_active,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(material_id = id, "Material updated");

    Ok(success_response(material))
}

/// Delete a material; deactivates instead when recipes reference it
async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .services
        .materials
        .delete(id)
        .await
        .map_err(map_service_error)?;

    info!(material_id = id, ?outcome, "Material delete processed");

    match outcome {
        DeleteOutcome::Deleted => Ok(no_content_response()),
        deactivated => Ok(success_response(deactivated)),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_material))
        .route("/", get(list_materials))
        .route("/categories", get(list_categories))
        .route("/:id", get(get_material))
        .route("/:id", put(update_material))
        .route("/:id", delete(delete_material))
}
