//! Invoice design API handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::super::state::AppState;
use super::{ApiResult, api_error};
use crate::invoice::{
    InvoiceDesignConfig, InvoiceTemplate, ResetRequest, SampleInvoice, SlotState, Theme,
    render_preview,
};

#[derive(Serialize)]
pub struct DesignView {
    pub state: SlotState,
    pub config: InvoiceDesignConfig,
}

#[derive(Serialize)]
pub struct TemplateView {
    pub state: SlotState,
    pub template: InvoiceTemplate,
}

#[derive(Serialize)]
pub struct ThemeView {
    pub name: &'static str,
    pub config: InvoiceDesignConfig,
}

/// GET /api/invoice/design
pub async fn get_design(State(state): State<Arc<AppState>>) -> Json<DesignView> {
    let invoice = state.invoice.read().await;
    Json(DesignView {
        state: invoice.design.state(),
        config: invoice.design.current().clone(),
    })
}

/// PUT /api/invoice/design - Stage an edit; nothing is persisted yet.
pub async fn edit_design(
    State(state): State<Arc<AppState>>,
    Json(config): Json<InvoiceDesignConfig>,
) -> ApiResult<Json<DesignView>> {
    let mut invoice = state.invoice.write().await;
    invoice.edit_design(config).map_err(api_error)?;
    Ok(Json(DesignView {
        state: invoice.design.state(),
        config: invoice.design.current().clone(),
    }))
}

/// POST /api/invoice/design/save
pub async fn save_design(State(state): State<Arc<AppState>>) -> ApiResult<Json<DesignView>> {
    let mut invoice = state.invoice.write().await;
    invoice.design.save().map_err(api_error)?;
    Ok(Json(DesignView {
        state: invoice.design.state(),
        config: invoice.design.current().clone(),
    }))
}

/// POST /api/invoice/design/discard
pub async fn discard_design(State(state): State<Arc<AppState>>) -> Json<DesignView> {
    let mut invoice = state.invoice.write().await;
    invoice.design.discard();
    Json(DesignView {
        state: invoice.design.state(),
        config: invoice.design.current().clone(),
    })
}

/// POST /api/invoice/design/reset - Returns the token needed to confirm.
pub async fn request_reset(State(state): State<Arc<AppState>>) -> Json<ResetRequest> {
    Json(state.invoice.write().await.design.request_reset())
}

/// POST /api/invoice/design/reset/confirm
pub async fn confirm_reset(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResetRequest>,
) -> ApiResult<Json<DesignView>> {
    let mut invoice = state.invoice.write().await;
    invoice.design.confirm_reset(request).map_err(api_error)?;
    Ok(Json(DesignView {
        state: invoice.design.state(),
        config: invoice.design.current().clone(),
    }))
}

/// POST /api/invoice/design/theme/:name - Stage a preset theme.
pub async fn apply_theme(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<DesignView>> {
    let theme = Theme::by_name(&name)
        .ok_or((StatusCode::NOT_FOUND, format!("Unknown theme: {name}")))?;
    let mut invoice = state.invoice.write().await;
    invoice.apply_theme(theme);
    Ok(Json(DesignView {
        state: invoice.design.state(),
        config: invoice.design.current().clone(),
    }))
}

/// GET /api/invoice/themes
pub async fn themes() -> Json<Vec<ThemeView>> {
    Json(
        Theme::all()
            .iter()
            .map(|t| ThemeView {
                name: t.name(),
                config: t.config(),
            })
            .collect(),
    )
}

/// GET /api/invoice/template
pub async fn get_template(State(state): State<Arc<AppState>>) -> Json<TemplateView> {
    let invoice = state.invoice.read().await;
    Json(TemplateView {
        state: invoice.template.state(),
        template: *invoice.template.current(),
    })
}

#[derive(Deserialize)]
pub struct TemplateChoice {
    pub template: InvoiceTemplate,
}

/// PUT /api/invoice/template - Choose and persist a layout (1..=5).
pub async fn choose_template(
    State(state): State<Arc<AppState>>,
    Json(choice): Json<TemplateChoice>,
) -> ApiResult<Json<TemplateView>> {
    let mut invoice = state.invoice.write().await;
    invoice.choose_template(choice.template).map_err(api_error)?;
    Ok(Json(TemplateView {
        state: invoice.template.state(),
        template: *invoice.template.current(),
    }))
}

/// POST /api/invoice/template/reset
pub async fn request_template_reset(State(state): State<Arc<AppState>>) -> Json<ResetRequest> {
    Json(state.invoice.write().await.template.request_reset())
}

/// POST /api/invoice/template/reset/confirm
pub async fn confirm_template_reset(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResetRequest>,
) -> ApiResult<Json<TemplateView>> {
    let mut invoice = state.invoice.write().await;
    invoice.template.confirm_reset(request).map_err(api_error)?;
    Ok(Json(TemplateView {
        state: invoice.template.state(),
        template: *invoice.template.current(),
    }))
}

/// Overrides for a one-off preview.
#[derive(Deserialize, Default)]
pub struct PreviewRequest {
    pub config: Option<InvoiceDesignConfig>,
    pub template: Option<InvoiceTemplate>,
    pub sample: Option<SampleInvoice>,
}

/// GET /api/invoice/preview - Preview the current design.
pub async fn preview(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.invoice.read().await.preview(&SampleInvoice::demo()))
}

/// POST /api/invoice/preview - Preview with overrides, without staging them.
pub async fn preview_with(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviewRequest>,
) -> ApiResult<Html<String>> {
    let invoice = state.invoice.read().await;
    let config = req
        .config
        .unwrap_or_else(|| invoice.design.current().clone());
    config.validate().map_err(api_error)?;
    let template = req.template.unwrap_or(*invoice.template.current());
    let sample = req.sample.unwrap_or_else(SampleInvoice::demo);
    Ok(Html(render_preview(&config, template, &sample)))
}
