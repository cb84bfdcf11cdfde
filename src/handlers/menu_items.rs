use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::menu_items::{CreateMenuItemInput, MenuItemFilter, SetPriceInput, UpdateMenuItemInput},
    services::suppliers::DeleteOutcome,
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
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category: Option<String>,
    /// Portions one batch of the recipe yields
    #[validate(range(min = 1))]
    pub standard_portion: i32,
    pub standard_portion_unit: Option<String>,
    pub standard_labor_hours: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 1))]
    pub standard_portion: Option<i32>,
    pub standard_portion_unit: Option<String>,
    pub standard_labor_hours: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetPriceRequest {
    pub selling_price: Decimal,
    pub effective_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MenuItemListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

// Handler functions

/// Create a menu item
async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let item = state
        .services
        .menu_items
        .create(CreateMenuItemInput {
            code: payload.code,
            name: payload.name,
            category: payload.category,
            standard_portion: payload.standard_portion,
            standard_portion_unit: payload.standard_portion_unit,
            standard_labor_hours: payload.standard_labor_hours,
        })
        .await
        .map_err(map_service_error)?;

    info!(menu_item_id = item.id, code = %item.code, "Menu item created");

    Ok(created_response(item))
}

/// Get a menu item by ID
async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .menu_items
        .get(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(item))
}

/// List menu items with search and filters
async fn list_menu_items(
    State(state): State<AppState>,
    Query(query): Query<MenuItemListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = MenuItemFilter {
        search: query.search,
        category: query.category,
        is_active: query.is_active,
    };

    let (items, total) = state
        .services
        .menu_items
        .list(filter, query.pagination.page, query.pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        items,
        query.pagination.page,
        query.pagination.per_page,
        total,
    )))
}

/// Distinct menu item categories
async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .menu_items
        .categories()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(categories))
}

/// Update a menu item
async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let item = state
        .services
        .menu_items
        .update(
            id,
            UpdateMenuItemInput {
                name: payload.name,
                category: payload.category,
                standard_portion: payload.standard_portion,
                standard_portion_unit: payload.standard_portion_unit,
                standard_labor_hours: payload.standard_labor_hours,
                is_active: payload.is_active,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(menu_item_id = id, "Menu item updated");

    Ok(success_response(item))
}

/// Delete a menu item; deactivates instead when production history exists
async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .services
        .menu_items
        .delete(id)
        .await
        .map_err(map_service_error)?;

    info!(menu_item_id = id, ?outcome, "Menu item delete processed");

    match outcome {
        DeleteOutcome::Deleted => Ok(no_content_response()),
        deactivated => Ok(success_response(deactivated)),
    }
}

/// Record a new selling price; earlier prices are kept for history
async fn set_price(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SetPriceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let pricing = state
        .services
        .menu_items
        .set_price(
            id,
            SetPriceInput {
                selling_price: payload.selling_price,
                effective_date: payload.effective_date,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(menu_item_id = id, selling_price = %pricing.selling_price, "Price set");

    Ok(created_response(pricing))
}

/// Current selling price, if one has been set
async fn current_price(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pricing = state
        .services
        .menu_items
        .current_price(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(pricing))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_menu_item))
        .route("/", get(list_menu_items))
        .route("/categories", get(list_categories))
        .route("/:id", get(get_menu_item))
        .route("/:id", put(update_menu_item))
        .route("/:id", delete(delete_menu_item))
        .route("/:id/pricing", post(set_price))
        .route("/:id/pricing", get(current_price))
}
