//! HTTP handlers for the server.

pub mod batch;
pub mod invoice;
pub mod selection;
pub mod settings;
pub mod templates;

use axum::http::StatusCode;
use tracing::warn;

use crate::error::LabelkitError;

/// Handler error: status plus a message body.
pub type ApiError = (StatusCode, String);

pub type ApiResult<T> = Result<T, ApiError>;

/// Map a library error onto an HTTP status.
pub fn api_error(err: LabelkitError) -> ApiError {
    let status = match &err {
        LabelkitError::NoSelection | LabelkitError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        LabelkitError::InvalidSymbolValue { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        LabelkitError::NotFound(_) => StatusCode::NOT_FOUND,
        LabelkitError::ArchiveUnavailable => StatusCode::CONFLICT,
        LabelkitError::PrintSurfaceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(error = %err, "request failed");
    }
    (status, err.to_string())
}
