//! Code rendering settings.
//!
//! One flat record covers both modes; fields for the inactive mode are kept
//! so switching back and forth does not lose them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::MAX_DIMENSION;
use crate::error::LabelkitError;

/// Which encoder a batch uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeMode {
    #[default]
    Barcode,
    #[serde(alias = "qr")]
    QrCode,
}

impl CodeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeMode::Barcode => "barcode",
            CodeMode::QrCode => "qrcode",
        }
    }
}

impl fmt::Display for CodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeMode {
    type Err = LabelkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "barcode" => Ok(CodeMode::Barcode),
            "qrcode" | "qr" => Ok(CodeMode::QrCode),
            other => Err(LabelkitError::InvalidInput(format!("unknown mode '{other}'"))),
        }
    }
}

/// Linear barcode symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarcodeFormat {
    #[default]
    Code128,
    Code39,
    Code93,
    Ean13,
    Ean8,
    UpcA,
    Itf,
    Codabar,
}

impl BarcodeFormat {
    pub const ALL: [BarcodeFormat; 8] = [
        BarcodeFormat::Code128,
        BarcodeFormat::Code39,
        BarcodeFormat::Code93,
        BarcodeFormat::Ean13,
        BarcodeFormat::Ean8,
        BarcodeFormat::UpcA,
        BarcodeFormat::Itf,
        BarcodeFormat::Codabar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BarcodeFormat::Code128 => "CODE128",
            BarcodeFormat::Code39 => "CODE39",
            BarcodeFormat::Code93 => "CODE93",
            BarcodeFormat::Ean13 => "EAN13",
            BarcodeFormat::Ean8 => "EAN8",
            BarcodeFormat::UpcA => "UPC",
            BarcodeFormat::Itf => "ITF",
            BarcodeFormat::Codabar => "codabar",
        }
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BarcodeFormat {
    type Err = LabelkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "code128" => Ok(BarcodeFormat::Code128),
            "code39" => Ok(BarcodeFormat::Code39),
            "code93" => Ok(BarcodeFormat::Code93),
            "ean13" => Ok(BarcodeFormat::Ean13),
            "ean8" => Ok(BarcodeFormat::Ean8),
            "upc" | "upca" => Ok(BarcodeFormat::UpcA),
            "itf" | "itf14" => Ok(BarcodeFormat::Itf),
            "codabar" => Ok(BarcodeFormat::Codabar),
            _ => Err(LabelkitError::InvalidInput(format!(
                "unknown barcode format '{s}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Top,
    #[default]
    Bottom,
}

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QrErrorLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

/// An RGBA color, written as a hex string in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const WHITE: Color = Color([255, 255, 255, 255]);

    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0;
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl FromStr for Color {
    type Err = LabelkitError;

    /// Parses `#rgb`, `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || LabelkitError::InvalidInput(format!("invalid color '{s}'"));
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2).ok_or_else(bad)?, 16).map_err(|_| bad());

        match hex.len() {
            3 => {
                let mut out = [255u8; 4];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(bad)? as u8;
                    out[i] = v * 17;
                }
                Ok(Color(out))
            }
            6 => Ok(Color([byte(0)?, byte(2)?, byte(4)?, 255])),
            8 => Ok(Color([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => Err(bad()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Visual parameters for linear barcodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeOptions {
    /// Width of one module (narrowest bar) in pixels
    pub module_width: u32,
    /// Bar height in pixels
    pub height: u32,
    /// Human-readable text height in pixels
    pub font_size: u32,
    /// Quiet zone around the symbol in pixels
    pub margin: u32,
    /// Gap between bars and text in pixels
    pub text_margin: u32,
    pub display_value: bool,
    pub text_align: TextAlign,
    pub text_position: TextPosition,
    pub line_color: Color,
    pub background: Color,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            module_width: 2,
            height: 100,
            font_size: 20,
            margin: 10,
            text_margin: 2,
            display_value: true,
            text_align: TextAlign::Center,
            text_position: TextPosition::Bottom,
            line_color: Color::BLACK,
            background: Color::WHITE,
        }
    }
}

/// QR parameters. Colors come from [`BarcodeOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    pub error_correction: QrErrorLevel,
    /// Quiet zone in modules
    pub margin: u32,
    /// Pixels per module
    pub scale: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            error_correction: QrErrorLevel::M,
            margin: 4,
            scale: 4,
        }
    }
}

/// Complete settings snapshot for one render.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeSettings {
    pub mode: CodeMode,
    pub format: BarcodeFormat,
    pub barcode: BarcodeOptions,
    pub qr: QrOptions,
}

impl CodeSettings {
    pub fn qr() -> Self {
        Self {
            mode: CodeMode::QrCode,
            ..Default::default()
        }
    }

    pub fn barcode(format: BarcodeFormat) -> Self {
        Self {
            mode: CodeMode::Barcode,
            format,
            ..Default::default()
        }
    }

    /// Reject settings no encoder could honor.
    pub fn validate(&self) -> Result<(), LabelkitError> {
        if self.barcode.module_width == 0 || self.barcode.height == 0 {
            return Err(LabelkitError::InvalidInput(
                "module width and bar height must be positive".into(),
            ));
        }
        if self.qr.scale == 0 {
            return Err(LabelkitError::InvalidInput("QR scale must be positive".into()));
        }
        let b = &self.barcode;
        let sizes = [
            ("module width", b.module_width),
            ("bar height", b.height),
            ("font size", b.font_size),
            ("margin", b.margin),
            ("text margin", b.text_margin),
            ("QR margin", self.qr.margin),
            ("QR scale", self.qr.scale),
        ];
        if let Some((name, value)) = sizes.iter().find(|(_, v)| *v > MAX_DIMENSION) {
            return Err(LabelkitError::InvalidInput(format!(
                "{name} {value} exceeds {MAX_DIMENSION}px"
            )));
        }
        Ok(())
    }
}
