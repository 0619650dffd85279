//! Product records held in the selection store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_quantity() -> i64 {
    1
}

/// A product chosen for bulk code generation.
///
/// `quantity` is always at least 1; the store clamps every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedProduct {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub barcode: String,
    pub price: f64,
    pub category: String,
    pub brand: String,
    pub description: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub selected: bool,
    pub quantity: u32,
}

impl SelectedProduct {
    /// The value to encode: the barcode, or the SKU when no barcode is set.
    ///
    /// Returns `None` when the product has no identifying value at all.
    pub fn code_value(&self) -> Option<&str> {
        let barcode = self.barcode.trim();
        if !barcode.is_empty() {
            return Some(barcode);
        }
        let sku = self.sku.trim();
        (!sku.is_empty()).then_some(sku)
    }

    /// Case-insensitive substring match over name, SKU and barcode.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.sku.to_lowercase().contains(needle_lower)
            || self.barcode.to_lowercase().contains(needle_lower)
    }
}

/// Input for adding a product, either typed in manually or picked from a
/// catalog search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

impl NewProduct {
    /// Shorthand for a manual entry with only a name and SKU.
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            quantity: 1,
            ..Default::default()
        }
    }

    pub fn barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = barcode.into();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Turn the input into a stored record.
    ///
    /// Generates an id when none was supplied, falls back to the SKU as the
    /// barcode value and clamps the quantity.
    pub fn into_selected(self) -> SelectedProduct {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let barcode = if self.barcode.trim().is_empty() {
            self.sku.clone()
        } else {
            self.barcode
        };

        SelectedProduct {
            id,
            name: self.name,
            sku: self.sku,
            barcode,
            price: self.price,
            category: self.category,
            brand: self.brand,
            description: self.description,
            expiry_date: self.expiry_date,
            selected: true,
            quantity: clamp_quantity(self.quantity),
        }
    }
}

/// Clamp a requested quantity into `1..=u32::MAX`.
pub fn clamp_quantity(n: i64) -> u32 {
    n.clamp(1, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_used_as_barcode_fallback() {
        let p = NewProduct::new("Soap", "SKU-1").into_selected();
        assert_eq!(p.barcode, "SKU-1");
        assert_eq!(p.code_value(), Some("SKU-1"));
    }

    #[test]
    fn test_distinct_barcode_kept() {
        let p = NewProduct::new("Soap", "SKU-1")
            .barcode("5901234123457")
            .into_selected();
        assert_eq!(p.code_value(), Some("5901234123457"));
    }

    #[test]
    fn test_no_identifying_value() {
        let p = NewProduct::new("Mystery", "").into_selected();
        assert_eq!(p.code_value(), None);
    }

    #[test]
    fn test_generated_id() {
        let a = NewProduct::new("A", "A1").into_selected();
        let b = NewProduct::new("A", "A1").into_selected();
        assert_ne!(a.id, b.id);
        let c = NewProduct::new("A", "A1").with_id("fixed").into_selected();
        assert_eq!(c.id, "fixed");
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(-5), 1);
        assert_eq!(clamp_quantity(7), 7);
    }
}
