//! # Error Types
//!
//! This module defines error types used throughout the labelkit library.

use thiserror::Error;

/// Main error type for labelkit operations
#[derive(Debug, Error)]
pub enum LabelkitError {
    /// Batch generation requested with nothing selected
    #[error("No products selected for generation")]
    NoSelection,

    /// The encoder rejected a value for the chosen symbology
    #[error("Invalid value {value:?} for {format}: {reason}")]
    InvalidSymbolValue {
        value: String,
        format: String,
        reason: String,
    },

    /// Generic encoder failure; aborts the whole batch
    #[error("Failed to generate codes: {0}")]
    Encoding(String),

    /// Archive export requested but no archiver is compiled in or enabled
    #[error("Archive support is unavailable")]
    ArchiveUnavailable,

    /// The platform refused to open a print surface (no browser, blocked window)
    #[error("Print surface unavailable: {0}")]
    PrintSurfaceUnavailable(String),

    /// Unknown product, template or key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid parameter supplied by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Zip writer error
    #[error("Archive error: {0}")]
    Archive(String),

    /// Settings persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used across the crate.
pub type Result<T, E = LabelkitError> = std::result::Result<T, E>;
