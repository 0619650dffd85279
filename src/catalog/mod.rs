//! # Catalog and Selection
//!
//! Products enter the pipeline either typed in by hand or picked from a
//! catalog search. The catalog itself belongs to the surrounding POS backend;
//! [`Catalog`] is the seam, [`JsonCatalog`] a file-backed stand-in.
//!
//! - [`product`]: product records and manual-entry input
//! - [`selection`]: the working selection store

pub mod product;
pub mod selection;

pub use product::{NewProduct, SelectedProduct};
pub use selection::SelectionStore;

use std::path::Path;

use crate::error::Result;

/// Source of products that can be added to a selection.
pub trait Catalog {
    /// Case-insensitive search over name, SKU and barcode.
    fn search(&self, term: &str) -> Vec<NewProduct>;
}

/// A catalog loaded from a JSON array of products.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    products: Vec<NewProduct>,
}

impl JsonCatalog {
    pub fn new(products: Vec<NewProduct>) -> Self {
        Self { products }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let products: Vec<NewProduct> = serde_json::from_str(&raw)?;
        Ok(Self { products })
    }

    pub fn products(&self) -> &[NewProduct] {
        &self.products
    }
}

impl Catalog for JsonCatalog {
    fn search(&self, term: &str) -> Vec<NewProduct> {
        let needle = term.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.sku.to_lowercase().contains(&needle)
                    || p.barcode.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_catalog_search() {
        let json = r#"[
            {"name": "Oat Milk", "sku": "OAT-1", "price": 2.5},
            {"name": "Rice", "sku": "RCE-9", "barcode": "1234567890128"}
        ]"#;
        let products: Vec<NewProduct> = serde_json::from_str(json).unwrap();
        let catalog = JsonCatalog::new(products);

        let hits = catalog.search("oat");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].quantity, 1);

        assert_eq!(catalog.search("7890").len(), 1);
        assert_eq!(catalog.search("").len(), 2);
    }

    #[test]
    fn test_json_catalog_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"name": "Salt", "sku": "S-1"}]"#).unwrap();
        let catalog = JsonCatalog::load(&path).unwrap();
        assert_eq!(catalog.products().len(), 1);
    }
}
