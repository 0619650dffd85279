//! Selection API handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::super::state::AppState;
use super::{ApiResult, api_error};
use crate::catalog::{Catalog, NewProduct, SelectedProduct};

#[derive(Serialize)]
pub struct SelectionView {
    pub products: Vec<SelectedProduct>,
    pub selected: usize,
    pub total_units: u64,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct Added {
    pub id: String,
}

#[derive(Deserialize)]
pub struct QuantityRequest {
    pub quantity: i64,
}

#[derive(Serialize)]
pub struct QuantityResponse {
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub selected: bool,
}

/// GET /api/selection - Current selection, optionally filtered with `?q=`.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<SelectionView> {
    let session = state.session.read().await;
    let products = session
        .selection
        .filter(&query.q)
        .into_iter()
        .cloned()
        .collect();
    Json(SelectionView {
        products,
        selected: session.selection.selected().len(),
        total_units: session.selection.total_units(),
    })
}

/// POST /api/selection - Add a manual entry or a catalog result.
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(product): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Added>)> {
    if product.name.trim().is_empty() && product.sku.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Product needs a name or SKU".to_string(),
        ));
    }
    let id = state.session.write().await.selection.add(product);
    Ok((StatusCode::CREATED, Json(Added { id })))
}

/// DELETE /api/selection - Clear the selection.
pub async fn clear(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.write().await.selection.clear();
    StatusCode::NO_CONTENT
}

/// DELETE /api/selection/:id
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SelectedProduct>> {
    let removed = state
        .session
        .write()
        .await
        .selection
        .remove(&id)
        .map_err(api_error)?;
    Ok(Json(removed))
}

/// POST /api/selection/:id/toggle
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ToggleResponse>> {
    let selected = state
        .session
        .write()
        .await
        .selection
        .toggle_select(&id)
        .map_err(api_error)?;
    Ok(Json(ToggleResponse { selected }))
}

/// PUT /api/selection/:id/quantity - Values below 1 are clamped to 1.
pub async fn set_quantity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<QuantityRequest>,
) -> ApiResult<Json<QuantityResponse>> {
    let quantity = state
        .session
        .write()
        .await
        .selection
        .set_quantity(&id, req.quantity)
        .map_err(api_error)?;
    Ok(Json(QuantityResponse { quantity }))
}

/// POST /api/selection/select-all
pub async fn select_all(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.write().await.selection.select_all();
    StatusCode::NO_CONTENT
}

/// POST /api/selection/deselect-all
pub async fn deselect_all(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.write().await.selection.deselect_all();
    StatusCode::NO_CONTENT
}

/// GET /api/catalog/search?q= - Search the configured catalog.
pub async fn search_catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<NewProduct>>> {
    let catalog = state.catalog.as_ref().ok_or((
        StatusCode::NOT_FOUND,
        "No catalog configured".to_string(),
    ))?;
    Ok(Json(catalog.search(&query.q)))
}
