//! Label Composer: product + rendered code + settings → HTML fragment.

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::Serialize;
use std::fmt::Write;

use super::settings::LabelSettings;
use crate::batch::RenderedUnit;
use crate::catalog::SelectedProduct;
use crate::error::{LabelkitError, Result};
use crate::html::{css_value, esc};

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// One composed label, ready to drop into a print grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelFragment {
    pub product_id: String,
    pub unit_index: u32,
    pub html: String,
}

/// Format a price with the currency symbol and two decimals.
pub fn format_price(symbol: &str, price: f64) -> String {
    format!("{symbol}{price:.2}")
}

/// Format a date with a strftime pattern. `None` when the pattern is
/// malformed or asks for fields a plain date lacks (`%H`, `%z`, ...).
pub fn try_format_date(date: NaiveDate, pattern: &str) -> Option<String> {
    if pattern.trim().is_empty()
        || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
    {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).ok()?;
    Some(out)
}

/// Format a date with a strftime pattern, falling back to ISO on a bad pattern.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    try_format_date(date, pattern)
        .unwrap_or_else(|| date.format(DEFAULT_DATE_FORMAT).to_string())
}

/// Reject a pattern that cannot format a date.
pub fn check_date_format(pattern: &str) -> Result<()> {
    match try_format_date(NaiveDate::default(), pattern) {
        Some(_) => Ok(()),
        None => Err(LabelkitError::InvalidInput(format!(
            "date format {pattern:?} is not a valid date-only pattern"
        ))),
    }
}

/// Compose one label. Fields whose flag is off are left out of the markup
/// entirely.
pub fn compose(
    product: &SelectedProduct,
    unit: &RenderedUnit,
    settings: &LabelSettings,
) -> Result<LabelFragment> {
    let mut body = String::new();

    if settings.show_business_name && !settings.business_name.trim().is_empty() {
        body.push_str(&format!(
            "<div class=\"label-business\">{}</div>",
            esc(settings.business_name.trim())
        ));
    }

    if settings.show_product_name {
        body.push_str(&format!(
            "<div class=\"label-name\" style=\"font-size:{}pt\">{}</div>",
            settings.title_font_size_pt,
            esc(&product.name)
        ));
    }

    body.push_str(&format!(
        "<img class=\"label-code\" src=\"{}\" alt=\"{}\"/>",
        unit.image.to_data_uri()?,
        esc(product.code_value().unwrap_or(&product.name))
    ));

    if settings.show_sku && !product.sku.is_empty() {
        body.push_str(&format!(
            "<div class=\"label-sku\">SKU: {}</div>",
            esc(&product.sku)
        ));
    }

    if settings.show_description
        && let Some(description) = product
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    {
        body.push_str(&format!(
            "<div class=\"label-description\">{}</div>",
            esc(description)
        ));
    }

    if settings.show_price {
        body.push_str(&format!(
            "<div class=\"label-price\">{}</div>",
            esc(&format_price(&settings.currency_symbol, product.price))
        ));
    }

    if settings.show_expiry
        && let Some(date) = product.expiry_date.or(settings.expiry_date)
    {
        body.push_str(&format!(
            "<div class=\"label-expiry\">Exp: {}</div>",
            esc(&format_date(date, &settings.expiry_format))
        ));
    }

    let style = format!(
        "width:{}mm;height:{}mm;border:{};border-radius:{}px;font-family:{};font-size:{}pt;color:{};background:{}",
        settings.label_width_mm,
        settings.label_height_mm,
        settings.border.css(),
        settings.border.radius_px,
        css_value(&settings.font_family),
        settings.font_size_pt,
        settings.text_color.to_hex(),
        settings.background.to_hex(),
    );

    Ok(LabelFragment {
        product_id: product.id.clone(),
        unit_index: unit.unit_index,
        html: format!("<div class=\"label\" style=\"{style}\">{body}</div>"),
    })
}
