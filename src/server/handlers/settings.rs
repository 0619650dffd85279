//! Code and label settings handlers.
//!
//! Settings are replaced wholesale on PUT and go back to defaults on reset.
//! A batch already generated keeps the snapshot it was rendered with.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::super::state::AppState;
use super::{ApiResult, api_error};
use crate::label::LabelSettings;
use crate::symbology::CodeSettings;

/// GET /api/settings/code
pub async fn get_code(State(state): State<Arc<AppState>>) -> Json<CodeSettings> {
    Json(state.session.read().await.code.clone())
}

/// PUT /api/settings/code
pub async fn put_code(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<CodeSettings>,
) -> ApiResult<Json<CodeSettings>> {
    settings.validate().map_err(api_error)?;
    state.session.write().await.code = settings.clone();
    Ok(Json(settings))
}

/// POST /api/settings/code/reset
pub async fn reset_code(State(state): State<Arc<AppState>>) -> Json<CodeSettings> {
    let settings = CodeSettings::default();
    state.session.write().await.code = settings.clone();
    Json(settings)
}

/// GET /api/settings/label
pub async fn get_label(State(state): State<Arc<AppState>>) -> Json<LabelSettings> {
    Json(state.session.read().await.label.clone())
}

/// PUT /api/settings/label
pub async fn put_label(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<LabelSettings>,
) -> ApiResult<Json<LabelSettings>> {
    settings.validate().map_err(api_error)?;
    state.session.write().await.label = settings.clone();
    Ok(Json(settings))
}

/// POST /api/settings/label/reset
pub async fn reset_label(State(state): State<Arc<AppState>>) -> Json<LabelSettings> {
    let settings = LabelSettings::default();
    state.session.write().await.label = settings.clone();
    Json(settings)
}
