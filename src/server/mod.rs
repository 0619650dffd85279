//! # HTTP Server for Bulk Code Generation
//!
//! Exposes the selection, settings, batch export, label templates and
//! invoice design over a JSON API.
//!
//! ## Usage
//!
//! ```bash
//! labelkit serve --listen 0.0.0.0:8080 --data-dir ./labelkit-data
//! ```
//!
//! A typical session adds products with `POST /api/selection`, generates
//! with `POST /api/batch`, then fetches `/api/batch/archive` or
//! `/api/batch/print`.

mod handlers;
mod state;

pub use state::{AppState, ServerConfig, Session};

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{LabelkitError, Result};

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Selection API
        .route(
            "/api/selection",
            get(handlers::selection::list)
                .post(handlers::selection::add)
                .delete(handlers::selection::clear),
        )
        .route(
            "/api/selection/select-all",
            post(handlers::selection::select_all),
        )
        .route(
            "/api/selection/deselect-all",
            post(handlers::selection::deselect_all),
        )
        .route(
            "/api/selection/:id",
            axum::routing::delete(handlers::selection::remove),
        )
        .route(
            "/api/selection/:id/toggle",
            post(handlers::selection::toggle),
        )
        .route(
            "/api/selection/:id/quantity",
            put(handlers::selection::set_quantity),
        )
        .route(
            "/api/catalog/search",
            get(handlers::selection::search_catalog),
        )
        // Settings API
        .route(
            "/api/settings/code",
            get(handlers::settings::get_code).put(handlers::settings::put_code),
        )
        .route(
            "/api/settings/code/reset",
            post(handlers::settings::reset_code),
        )
        .route(
            "/api/settings/label",
            get(handlers::settings::get_label).put(handlers::settings::put_label),
        )
        .route(
            "/api/settings/label/reset",
            post(handlers::settings::reset_label),
        )
        // Batch API
        .route(
            "/api/batch",
            get(handlers::batch::show).post(handlers::batch::generate),
        )
        .route("/api/batch/units/:index", get(handlers::batch::unit_png))
        .route("/api/batch/archive", get(handlers::batch::archive))
        .route("/api/batch/print", get(handlers::batch::print))
        // Label template API
        .route(
            "/api/templates",
            get(handlers::templates::list).post(handlers::templates::create),
        )
        .route(
            "/api/templates/default",
            get(handlers::templates::default_template),
        )
        .route(
            "/api/templates/:id",
            get(handlers::templates::get)
                .put(handlers::templates::update)
                .delete(handlers::templates::delete),
        )
        .route(
            "/api/templates/:id/default",
            post(handlers::templates::set_default),
        )
        // Invoice design API
        .route(
            "/api/invoice/design",
            get(handlers::invoice::get_design).put(handlers::invoice::edit_design),
        )
        .route(
            "/api/invoice/design/save",
            post(handlers::invoice::save_design),
        )
        .route(
            "/api/invoice/design/discard",
            post(handlers::invoice::discard_design),
        )
        .route(
            "/api/invoice/design/reset",
            post(handlers::invoice::request_reset),
        )
        .route(
            "/api/invoice/design/reset/confirm",
            post(handlers::invoice::confirm_reset),
        )
        .route(
            "/api/invoice/design/theme/:name",
            post(handlers::invoice::apply_theme),
        )
        .route("/api/invoice/themes", get(handlers::invoice::themes))
        .route(
            "/api/invoice/template",
            get(handlers::invoice::get_template).put(handlers::invoice::choose_template),
        )
        .route(
            "/api/invoice/template/reset",
            post(handlers::invoice::request_template_reset),
        )
        .route(
            "/api/invoice/template/reset/confirm",
            post(handlers::invoice::confirm_template_reset),
        )
        .route(
            "/api/invoice/preview",
            get(handlers::invoice::preview).post(handlers::invoice::preview_with),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use labelkit::server::{serve, ServerConfig};
/// use labelkit::AppConfig;
///
/// # async fn example() -> Result<(), labelkit::LabelkitError> {
/// let config = ServerConfig::from(AppConfig::default());
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listen_addr = config.listen_addr.clone();
    let data_dir = config.data_dir.clone();
    let state = Arc::new(AppState::new(config)?);
    let app = router(state.clone());

    info!(
        listen = %listen_addr,
        data_dir = %data_dir.display(),
        archive = state.archive.is_available(),
        "labelkit HTTP server starting"
    );

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| {
            LabelkitError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {listen_addr}: {e}"),
            ))
        })?;

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::{MemoryStore, SettingsStore};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_state(archive_enabled: bool) -> Arc<AppState> {
        let config = ServerConfig {
            archive_enabled,
            ..ServerConfig::from(AppConfig::default())
        };
        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());
        Arc::new(AppState::with_store(config, store).unwrap())
    }

    async fn call(
        state: &Arc<AppState>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = router(state.clone())
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn call_json(
        state: &Arc<AppState>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = call(state, method, uri, body).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn add(state: &Arc<AppState>, name: &str, sku: &str, quantity: i64) -> String {
        let (status, body) = call_json(
            state,
            "POST",
            "/api/selection",
            Some(json!({"name": name, "sku": sku, "quantity": quantity})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_generate_with_empty_selection() {
        let state = test_state(true);
        let (status, _) = call(&state, "POST", "/api/batch", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&state, "GET", "/api/batch/archive", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_and_download_units() {
        let state = test_state(true);
        add(&state, "Tea", "T-1", 2).await;
        add(&state, "Mug", "M-1", 1).await;

        let (status, body) = call_json(&state, "POST", "/api/batch", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["rendered_units"], 3);
        assert_eq!(body["units"][1]["file_name"], "tea-barcode-2.png");

        let (status, png) = call(&state, "GET", "/api/batch/units/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&png[..4], b"\x89PNG");

        let (status, _) = call(&state, "GET", "/api/batch/units/3", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_same_name_products_get_distinct_file_names() {
        let state = test_state(true);
        add(&state, "Tea", "T-1", 1).await;
        add(&state, "Tea", "T-2", 1).await;

        let (status, body) = call_json(&state, "POST", "/api/batch", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["units"][0]["file_name"], "tea-t-1-barcode-1.png");
        assert_eq!(body["units"][1]["file_name"], "tea-t-2-barcode-1.png");
    }

    #[tokio::test]
    async fn test_oversized_batch_is_bad_request() {
        let state = test_state(true);
        add(&state, "Tea", "T-1", u32::MAX as i64).await;
        let (status, _) = call(&state, "POST", "/api/batch", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&state, "GET", "/api/batch", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_quantity_is_clamped() {
        let state = test_state(true);
        let id = add(&state, "Tea", "T-1", 1).await;
        let (status, body) = call_json(
            &state,
            "PUT",
            &format!("/api/selection/{id}/quantity"),
            Some(json!({"quantity": -4})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quantity"], 1);
    }

    #[tokio::test]
    async fn test_archive_fallback_lists_units() {
        let state = test_state(false);
        add(&state, "Tea", "T-1", 2).await;
        call(&state, "POST", "/api/batch", None).await;

        let (status, body) = call_json(&state, "GET", "/api/batch/archive", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fallback"], true);
        assert_eq!(body["files"].as_array().unwrap().len(), 2);
        assert_eq!(body["files"][0]["url"], "/api/batch/units/0");
    }

    #[tokio::test]
    async fn test_print_uses_template_settings() {
        let state = test_state(true);
        add(&state, "Tea", "T-1", 1).await;
        call(&state, "POST", "/api/batch", None).await;

        let (status, tpl) = call_json(
            &state,
            "POST",
            "/api/templates",
            Some(json!({"name": "Shelf", "config": {"labels_per_row": 5}})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tpl["is_default"], true);

        let id = tpl["id"].as_str().unwrap();
        let (status, html) = call(&state, "GET", &format!("/api/batch/print?template={id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("repeat(5,"));
    }

    #[tokio::test]
    async fn test_invalid_code_settings_rejected() {
        let state = test_state(true);
        let (status, _) = call(
            &state,
            "PUT",
            "/api/settings/code",
            Some(json!({"barcode": {"module_width": 0}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invoice_reset_flow() {
        let state = test_state(true);
        let (status, body) =
            call_json(&state, "POST", "/api/invoice/design/theme/bold", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "editing");

        let (_, body) = call_json(&state, "POST", "/api/invoice/design/save", None).await;
        assert_eq!(body["state"], "saved");

        let (_, token) = call_json(&state, "POST", "/api/invoice/design/reset", None).await;
        let (status, body) = call_json(
            &state,
            "POST",
            "/api/invoice/design/reset/confirm",
            Some(token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "default");
    }

    #[tokio::test]
    async fn test_invoice_template_bounds() {
        let state = test_state(true);
        let (status, _) = call(
            &state,
            "PUT",
            "/api/invoice/template",
            Some(json!({"template": 7})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = call_json(
            &state,
            "PUT",
            "/api/invoice/template",
            Some(json!({"template": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["template"], 2);

        let (_, html) = call(&state, "GET", "/api/invoice/preview", None).await;
        assert!(String::from_utf8(html).unwrap().contains("class=\"banner\""));
    }
}
