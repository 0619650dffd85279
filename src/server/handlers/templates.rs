//! Label template API handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::super::state::AppState;
use super::{ApiResult, api_error};
use crate::label::{LabelTemplate, TemplateInput};

/// GET /api/templates
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<LabelTemplate>> {
    Json(state.templates.read().await.list().to_vec())
}

/// POST /api/templates
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TemplateInput>,
) -> ApiResult<(StatusCode, Json<LabelTemplate>)> {
    let template = state
        .templates
        .write()
        .await
        .create(input)
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/templates/default
pub async fn default_template(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LabelTemplate>> {
    state
        .templates
        .read()
        .await
        .default_template()
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "No default template".to_string()))
}

/// GET /api/templates/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<LabelTemplate>> {
    state
        .templates
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("Unknown template: {id}")))
}

/// PUT /api/templates/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<TemplateInput>,
) -> ApiResult<Json<LabelTemplate>> {
    let template = state
        .templates
        .write()
        .await
        .update(&id, input)
        .map_err(api_error)?;
    Ok(Json(template))
}

/// DELETE /api/templates/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<LabelTemplate>> {
    let removed = state
        .templates
        .write()
        .await
        .delete(&id)
        .map_err(api_error)?;
    Ok(Json(removed))
}

/// POST /api/templates/:id/default - Make this the only default.
pub async fn set_default(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<LabelTemplate>> {
    let mut templates = state.templates.write().await;
    let template = templates.set_default(&id).map_err(api_error)?.clone();
    Ok(Json(template))
}
