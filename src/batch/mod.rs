//! # Batch Orchestrator
//!
//! Expands a selection into one rendered unit per quantity and keeps the
//! result around for the export sinks.
//!
//! ```text
//! selected products ──→ for each product, quantity times:
//!                          value = barcode || sku
//!                          ├─ no value        → skipped (warn)
//!                          ├─ InvalidValue    → skipped (warn)
//!                          ├─ Encoder failure → abort whole batch
//!                          └─ image           → RenderedUnit { product_id, unit_index }
//! ```
//!
//! Every unit carries the id of the product it was rendered for, so the
//! export sinks never have to infer ownership from list positions. The
//! positional rule is still available in [`reassociate`].

pub mod reassociate;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::SelectedProduct;
use crate::error::{LabelkitError, Result};
use crate::symbology::{CodeMode, CodeRenderer, CodeSettings, RenderError, RenderedImage};

/// Most units one batch may request. Larger selections are rejected
/// before anything is rendered.
pub const MAX_BATCH_UNITS: u64 = 10_000;

/// One rendered code for one repetition of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedUnit {
    pub product_id: String,
    /// Zero-based repetition index within the product.
    pub unit_index: u32,
    pub image: RenderedImage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Neither barcode nor SKU set
    MissingValue,
    /// The encoder rejected the value
    InvalidValue { reason: String },
}

/// A unit that was requested but not rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedUnit {
    pub product_id: String,
    pub unit_index: u32,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// A completed generation run.
#[derive(Debug, Clone)]
pub struct Batch {
    pub mode: CodeMode,
    /// The selection the batch was generated from, in generation order.
    pub selected: Vec<SelectedProduct>,
    pub units: Vec<RenderedUnit>,
    pub skipped: Vec<SkippedUnit>,
    /// Σ quantity over `selected`
    pub requested_units: u64,
}

/// Counts shown to the user after a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub mode: CodeMode,
    pub products: usize,
    pub requested_units: u64,
    pub rendered_units: usize,
    pub skipped: Vec<SkippedUnit>,
}

impl GenerationReport {
    pub fn is_partial(&self) -> bool {
        (self.rendered_units as u64) < self.requested_units
    }

    /// "N of M generated" style summary.
    pub fn summary(&self) -> String {
        if self.is_partial() {
            format!(
                "Generated {} of {} {} codes ({} skipped)",
                self.rendered_units,
                self.requested_units,
                self.mode,
                self.skipped.len()
            )
        } else {
            format!("Generated {} {} codes", self.rendered_units, self.mode)
        }
    }
}

impl Batch {
    pub fn product(&self, product_id: &str) -> Option<&SelectedProduct> {
        self.selected.iter().find(|p| p.id == product_id)
    }

    /// The product a unit was rendered for.
    pub fn product_for(&self, unit: &RenderedUnit) -> Option<&SelectedProduct> {
        self.product(&unit.product_id)
    }

    pub fn units_for<'a>(&'a self, product_id: &'a str) -> impl Iterator<Item = &'a RenderedUnit> + 'a {
        self.units.iter().filter(move |u| u.product_id == product_id)
    }

    /// Units paired with their products, in generation order.
    pub fn pairs(&self) -> impl Iterator<Item = (&SelectedProduct, &RenderedUnit)> {
        self.units
            .iter()
            .filter_map(|u| self.product_for(u).map(|p| (p, u)))
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn report(&self) -> GenerationReport {
        GenerationReport {
            mode: self.mode,
            products: self.selected.len(),
            requested_units: self.requested_units,
            rendered_units: self.units.len(),
            skipped: self.skipped.clone(),
        }
    }
}

/// Render every unit of `selected` with one settings snapshot.
///
/// Fails with [`LabelkitError::NoSelection`] before rendering anything when
/// `selected` is empty, with [`LabelkitError::InvalidInput`] when it asks
/// for more than [`MAX_BATCH_UNITS`] units, and with [`LabelkitError::Encoding`] (discarding all
/// work) when the encoder fails for a reason other than a bad value.
pub fn generate(
    selected: Vec<SelectedProduct>,
    settings: &CodeSettings,
    renderer: &dyn CodeRenderer,
) -> Result<Batch> {
    if selected.is_empty() {
        return Err(LabelkitError::NoSelection);
    }
    settings.validate()?;

    let requested_units: u64 = selected.iter().map(|p| p.quantity as u64).sum();
    if requested_units > MAX_BATCH_UNITS {
        return Err(LabelkitError::InvalidInput(format!(
            "{requested_units} units requested; one batch is limited to {MAX_BATCH_UNITS}"
        )));
    }
    let mut units = Vec::with_capacity(requested_units as usize);
    let mut skipped = Vec::new();

    info!(
        mode = %settings.mode,
        products = selected.len(),
        units = requested_units,
        "generating batch"
    );

    for product in &selected {
        let Some(value) = product.code_value() else {
            for unit_index in 0..product.quantity {
                warn!(
                    product = %product.name,
                    id = %product.id,
                    unit_index,
                    "product has no barcode or SKU; skipping unit"
                );
                skipped.push(SkippedUnit {
                    product_id: product.id.clone(),
                    unit_index,
                    reason: SkipReason::MissingValue,
                });
            }
            continue;
        };

        for unit_index in 0..product.quantity {
            match renderer.render(value, settings) {
                Ok(image) => units.push(RenderedUnit {
                    product_id: product.id.clone(),
                    unit_index,
                    image,
                }),
                Err(RenderError::InvalidValue { reason, .. }) => {
                    warn!(
                        product = %product.name,
                        value,
                        format = %settings.format,
                        "invalid value for symbology: {}",
                        reason
                    );
                    skipped.push(SkippedUnit {
                        product_id: product.id.clone(),
                        unit_index,
                        reason: SkipReason::InvalidValue { reason },
                    });
                }
                Err(RenderError::Encoder(msg)) => {
                    return Err(LabelkitError::Encoding(format!(
                        "{} ({}): {}",
                        product.name, value, msg
                    )));
                }
            }
        }
        debug!(product = %product.name, "rendered product units");
    }

    Ok(Batch {
        mode: settings.mode,
        selected,
        units,
        skipped,
        requested_units,
    })
}
