//! Inventory API Endpoints
//! Mission: Expose sweet CRUD and stock operations over HTTP

use crate::inventory::models::{
    QuantityResponse, RestockRequest, Sweet, SweetFilters, SweetPayload,
};
use crate::inventory::store::InventoryError;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info};

/// Create sweet - POST /api/sweets (admin)
pub async fn create_sweet(
    State(state): State<AppState>,
    Json(payload): Json<SweetPayload>,
) -> Result<(StatusCode, Json<Sweet>), InventoryApiError> {
    let sweet = payload.validate().map_err(InventoryApiError::Validation)?;
    let created = state.sweets.create(sweet)?;

    info!("🍬 Sweet added: {} (id {})", created.name, created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

/// List sweets - GET /api/sweets
pub async fn list_sweets(
    State(state): State<AppState>,
) -> Result<Json<Vec<Sweet>>, InventoryApiError> {
    Ok(Json(state.sweets.list_all()?))
}

/// Search sweets - GET /api/sweets/search
pub async fn search_sweets(
    State(state): State<AppState>,
    Query(filters): Query<SweetFilters>,
) -> Result<Json<Vec<Sweet>>, InventoryApiError> {
    Ok(Json(state.sweets.search(&filters)?))
}

/// Update sweet - PUT /api/sweets/:id (admin)
pub async fn update_sweet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SweetPayload>,
) -> Result<Json<serde_json::Value>, InventoryApiError> {
    let sweet = payload.validate().map_err(InventoryApiError::Validation)?;
    state.sweets.update(id, sweet)?;

    Ok(Json(json!({ "message": "Sweet updated successfully" })))
}

/// Delete sweet - DELETE /api/sweets/:id (admin)
pub async fn delete_sweet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, InventoryApiError> {
    state.sweets.delete(id)?;

    info!("🗑️  Sweet deleted: {}", id);

    Ok(Json(json!({ "message": "Sweet deleted successfully" })))
}

/// Purchase one unit - POST /api/sweets/:id/purchase
pub async fn purchase_sweet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuantityResponse>, InventoryApiError> {
    let new_quantity = state.sweets.purchase(id)?;

    Ok(Json(QuantityResponse {
        message: "Purchase successful".to_string(),
        new_quantity,
    }))
}

/// Restock - POST /api/sweets/:id/restock (admin)
pub async fn restock_sweet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RestockRequest>,
) -> Result<Json<QuantityResponse>, InventoryApiError> {
    let added = payload.quantity.unwrap_or(0);
    let new_quantity = state.sweets.restock(id, added)?;

    Ok(Json(QuantityResponse {
        message: "Restock successful".to_string(),
        new_quantity,
    }))
}

/// Inventory API errors
#[derive(Debug)]
pub enum InventoryApiError {
    Validation(&'static str),
    NotFound,
    OutOfStock,
    InvalidQuantity,
    InternalError,
}

impl From<InventoryError> for InventoryApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound => InventoryApiError::NotFound,
            InventoryError::OutOfStock => InventoryApiError::OutOfStock,
            InventoryError::InvalidQuantity => InventoryApiError::InvalidQuantity,
            InventoryError::Storage(e) => {
                error!("Inventory storage error: {}", e);
                InventoryApiError::InternalError
            }
        }
    }
}

impl IntoResponse for InventoryApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            InventoryApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            InventoryApiError::NotFound => (StatusCode::NOT_FOUND, "Sweet not found"),
            InventoryApiError::OutOfStock => (StatusCode::BAD_REQUEST, "Out of stock"),
            InventoryApiError::InvalidQuantity => (
                StatusCode::BAD_REQUEST,
                "Restock quantity must be a positive number",
            ),
            InventoryApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
