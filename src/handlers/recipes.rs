use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::recipes::{AddRecipeLineInput, UpdateRecipeLineInput},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use validator::Validate;

// Request DTOs

#[derive(Debug, Deserialize, Validate)]
pub struct AddRecipeLineRequest {
    pub raw_material_id: i64,
    pub quantity: Decimal,
    /// Defaults to the material's own unit
    pub unit: Option<String>,
    pub sequence: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRecipeLineRequest {
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub sequence: Option<i32>,
    pub notes: Option<String>,
}

// Handler functions

/// Recipe lines for a menu item, joined with material facts
async fn list_recipe(
    State(state): State<AppState>,
    Path(menu_item_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let lines = state
        .services
        .recipes
        .list(menu_item_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(lines))
}

/// Add a material line to a menu item's recipe
async fn add_line(
    State(state): State<AppState>,
    Path(menu_item_id): Path<i64>,
    Json(payload): Json<AddRecipeLineRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let line = state
        .services
        .recipes
        .add_line(
            menu_item_id,
            AddRecipeLineInput {
                raw_material_id: payload.raw_material_id,
                quantity: payload.quantity,
                unit: payload.unit,
                sequence: payload.sequence,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(
        menu_item_id,
        recipe_detail_id = line.id,
        material_id = line.raw_material_id,
        "Recipe line added"
    );

    Ok(created_response(line))
}

/// Update a recipe line
async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRecipeLineRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let line = state
        .services
        .recipes
        .update_line(
            id,
            UpdateRecipeLineInput {
                quantity: payload.quantity,
                unit: payload.unit,
                sequence: payload.sequence,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(recipe_detail_id = id, "Recipe line updated");

    Ok(success_response(line))
}

/// Remove a recipe line
async fn remove_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .recipes
        .remove_line(id)
        .await
        .map_err(map_service_error)?;

    info!(recipe_detail_id = id, "Recipe line removed");

    Ok(no_content_response())
}

/// Copy one menu item's recipe lines onto another
async fn duplicate_recipe(
    State(state): State<AppState>,
    Path((source_id, target_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let copied = state
        .services
        .recipes
        .duplicate(source_id, target_id)
        .await
        .map_err(map_service_error)?;

    info!(source_id, target_id, copied, "Recipe duplicated");

    Ok(created_response(json!({
        "source_menu_item_id": source_id,
        "target_menu_item_id": target_id,
        "lines_copied": copied,
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lines/:id", put(update_line))
        .route("/lines/:id", delete(remove_line))
        .route("/:menu_item_id", get(list_recipe))
        .route("/:menu_item_id/lines", post(add_line))
        .route(
            "/:source_id/duplicate/:target_id",
            post(duplicate_recipe),
        )
}
