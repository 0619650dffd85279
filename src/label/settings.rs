//! Label appearance settings.

use serde::{Deserialize, Serialize};

use crate::error::LabelkitError;
use crate::symbology::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    None,
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl BorderKind {
    fn css(&self) -> &'static str {
        match self {
            BorderKind::None => "none",
            BorderKind::Solid => "solid",
            BorderKind::Dashed => "dashed",
            BorderKind::Dotted => "dotted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderStyle {
    pub kind: BorderKind,
    pub width_px: u32,
    pub color: Color,
    pub radius_px: u32,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            kind: BorderKind::Solid,
            width_px: 1,
            color: Color([0xcc, 0xcc, 0xcc, 255]),
            radius_px: 4,
        }
    }
}

impl BorderStyle {
    /// CSS `border` shorthand.
    pub fn css(&self) -> String {
        match self.kind {
            BorderKind::None => "none".to_string(),
            kind => format!("{}px {} {}", self.width_px, kind.css(), self.color.to_hex()),
        }
    }
}

/// What goes on a label and how it is laid out.
///
/// Shared by one-off generation and by saved label templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub business_name: String,
    pub show_business_name: bool,
    pub show_product_name: bool,
    pub show_sku: bool,
    pub show_description: bool,
    pub show_price: bool,
    pub show_expiry: bool,
    /// Used when the product has no expiry date of its own.
    pub expiry_date: Option<chrono::NaiveDate>,
    /// chrono strftime pattern
    pub expiry_format: String,
    pub currency_symbol: String,
    pub font_family: String,
    pub font_size_pt: f32,
    pub title_font_size_pt: f32,
    pub text_color: Color,
    pub background: Color,
    pub border: BorderStyle,
    pub label_width_mm: f32,
    pub label_height_mm: f32,
    pub labels_per_row: u32,
    /// Gap between labels in the print grid
    pub gap_mm: f32,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            show_business_name: true,
            show_product_name: true,
            show_sku: false,
            show_description: false,
            show_price: true,
            show_expiry: false,
            expiry_date: None,
            expiry_format: "%Y-%m-%d".to_string(),
            currency_symbol: "$".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size_pt: 8.0,
            title_font_size_pt: 10.0,
            text_color: Color::BLACK,
            background: Color::WHITE,
            border: BorderStyle::default(),
            label_width_mm: 50.0,
            label_height_mm: 30.0,
            labels_per_row: 3,
            gap_mm: 2.0,
        }
    }
}

impl LabelSettings {
    pub fn validate(&self) -> Result<(), LabelkitError> {
        if self.labels_per_row == 0 {
            return Err(LabelkitError::InvalidInput(
                "labels per row must be at least 1".into(),
            ));
        }
        if self.label_width_mm <= 0.0 || self.label_height_mm <= 0.0 {
            return Err(LabelkitError::InvalidInput(
                "label dimensions must be positive".into(),
            ));
        }
        super::compose::check_date_format(&self.expiry_format)?;
        Ok(())
    }
}
