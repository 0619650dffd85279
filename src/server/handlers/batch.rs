//! Batch generation and export handlers.
//!
//! Generation works on a snapshot of the selection and code settings taken
//! under a read lock; the session is only written again to cache the result.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::super::state::AppState;
use super::{ApiResult, api_error};
use crate::batch::{self, Batch, GenerationReport};
use crate::error::LabelkitError;
use crate::export::{PrintDocument, archive_name, build_archive, unit_file_names};
use crate::symbology::SymbolRenderer;

#[derive(Serialize)]
pub struct UnitView {
    pub index: usize,
    pub product_id: String,
    pub unit_index: u32,
    pub file_name: String,
    pub url: String,
}

#[derive(Serialize)]
pub struct BatchView {
    pub summary: String,
    pub report: GenerationReport,
    pub units: Vec<UnitView>,
}

impl BatchView {
    fn of(batch: &Batch) -> Self {
        let report = batch.report();
        Self {
            summary: report.summary(),
            report,
            units: unit_views(batch),
        }
    }
}

fn unit_views(batch: &Batch) -> Vec<UnitView> {
    unit_file_names(batch)
        .into_iter()
        .zip(batch.pairs())
        .enumerate()
        .map(|(index, (file_name, (_, unit)))| UnitView {
            index,
            product_id: unit.product_id.clone(),
            unit_index: unit.unit_index,
            file_name,
            url: format!("/api/batch/units/{index}"),
        })
        .collect()
}

async fn last_batch(state: &AppState) -> ApiResult<Arc<Batch>> {
    state
        .session
        .read()
        .await
        .last_batch
        .clone()
        .ok_or((StatusCode::NOT_FOUND, "No batch generated yet".to_string()))
}

/// POST /api/batch - Generate codes for every selected unit.
pub async fn generate(State(state): State<Arc<AppState>>) -> ApiResult<Json<BatchView>> {
    let (selected, settings) = {
        let session = state.session.read().await;
        (session.selection.snapshot(), session.code.clone())
    };

    let batch = tokio::task::spawn_blocking(move || {
        batch::generate(selected, &settings, &SymbolRenderer)
    })
    .await
    .map_err(|e| api_error(LabelkitError::Encoding(e.to_string())))?
    .map_err(api_error)?;

    let view = BatchView::of(&batch);
    info!("{}", view.summary);
    state.session.write().await.last_batch = Some(Arc::new(batch));
    Ok(Json(view))
}

/// GET /api/batch - The cached batch.
pub async fn show(State(state): State<Arc<AppState>>) -> ApiResult<Json<BatchView>> {
    let batch = last_batch(&state).await?;
    Ok(Json(BatchView::of(&batch)))
}

/// GET /api/batch/units/:index - One unit as a PNG download.
pub async fn unit_png(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<Response> {
    let batch = last_batch(&state).await?;
    let (name, (_, unit)) = unit_file_names(&batch)
        .into_iter()
        .zip(batch.pairs())
        .nth(index)
        .ok_or((StatusCode::NOT_FOUND, format!("No unit {index}")))?;

    let png = unit.image.to_png().map_err(api_error)?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        png,
    )
        .into_response())
}

/// Returned instead of a zip when archiving is unavailable.
#[derive(Serialize)]
pub struct ArchiveFallback {
    pub fallback: bool,
    pub files: Vec<UnitView>,
}

/// GET /api/batch/archive - All units as one zip, or the per-unit list.
pub async fn archive(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let batch = last_batch(&state).await?;
    if !state.archive.is_available() {
        warn!("archive support unavailable; returning per-unit downloads");
        let fallback = ArchiveFallback {
            fallback: true,
            files: unit_views(&batch),
        };
        return Ok(Json(fallback).into_response());
    }

    let capability = state.archive;
    let name = archive_name(&batch);
    let bytes = tokio::task::spawn_blocking(move || build_archive(&batch, &capability))
        .await
        .map_err(|e| api_error(LabelkitError::Archive(e.to_string())))?
        .map_err(api_error)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct PrintQuery {
    /// Use a saved label template instead of the session label settings
    pub template: Option<String>,
}

/// GET /api/batch/print - Print-ready HTML for the cached batch.
pub async fn print(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PrintQuery>,
) -> ApiResult<Html<String>> {
    let batch = last_batch(&state).await?;
    let settings = match query.template {
        Some(id) => state
            .templates
            .read()
            .await
            .get(&id)
            .map(|t| t.config.clone())
            .ok_or_else(|| api_error(LabelkitError::NotFound(format!("template {id}"))))?,
        None => state.session.read().await.label.clone(),
    };

    let document = PrintDocument::build(&batch, &settings).map_err(api_error)?;
    Ok(Html(document.html))
}
