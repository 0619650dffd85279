//! # Code Renderer
//!
//! Turns a value plus a [`CodeSettings`] snapshot into a raster image.
//!
//! ```text
//! value ─┬─ mode = barcode ─→ linear::encode ─→ linear::rasterize ─┐
//!        └─ mode = qrcode  ─→ qr::render ───────────────────────────┴─→ RenderedImage
//! ```
//!
//! Encoders validate their own input. A rejected value is a recoverable
//! [`RenderError::InvalidValue`]; anything else is [`RenderError::Encoder`]
//! and aborts the batch that asked for it.
//!
//! ## Example
//!
//! ```
//! use labelkit::symbology::{CodeRenderer, CodeSettings, SymbolRenderer, BarcodeFormat};
//!
//! let settings = CodeSettings::barcode(BarcodeFormat::Code128);
//! let image = SymbolRenderer.render("SKU-001", &settings).unwrap();
//! let png = image.to_png().unwrap();
//! assert!(!png.is_empty());
//! ```

pub mod canvas;
pub mod font;
pub mod linear;
pub mod qr;
pub mod settings;

pub use canvas::RenderedImage;
pub use settings::{
    BarcodeFormat, BarcodeOptions, CodeMode, CodeSettings, Color, QrErrorLevel, QrOptions,
    TextAlign, TextPosition,
};

use thiserror::Error;

use crate::error::LabelkitError;

/// Largest surface edge the renderer will allocate, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Errors from a single render call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The encoder rejected the value for this symbology.
    #[error("Invalid value {value:?} for {format}: {reason}")]
    InvalidValue {
        value: String,
        format: String,
        reason: String,
    },

    /// The encoder failed for reasons unrelated to the value.
    #[error("Encoder failure: {0}")]
    Encoder(String),
}

impl RenderError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RenderError::InvalidValue { .. })
    }
}

impl From<RenderError> for LabelkitError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidValue {
                value,
                format,
                reason,
            } => LabelkitError::InvalidSymbolValue {
                value,
                format,
                reason,
            },
            RenderError::Encoder(msg) => LabelkitError::Encoding(msg),
        }
    }
}

/// Anything that can turn a value into a code image.
pub trait CodeRenderer {
    fn render(&self, value: &str, settings: &CodeSettings) -> Result<RenderedImage, RenderError>;
}

/// Production renderer backed by barcoders and qrcode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolRenderer;

impl CodeRenderer for SymbolRenderer {
    fn render(&self, value: &str, settings: &CodeSettings) -> Result<RenderedImage, RenderError> {
        match settings.mode {
            CodeMode::Barcode => {
                let symbol = linear::encode(value, settings.format)?;
                linear::rasterize(&symbol, &settings.barcode)
            }
            CodeMode::QrCode => qr::render(value, &settings.qr, &settings.barcode),
        }
    }
}
