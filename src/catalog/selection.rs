//! # Product Selection Store
//!
//! The working set of products picked for bulk generation. Insertion order is
//! preserved because it decides the order units come out of a batch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::product::{NewProduct, SelectedProduct, clamp_quantity};
use crate::error::{LabelkitError, Result};

/// In-memory selection for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionStore {
    products: Vec<SelectedProduct>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product. Returns the id of the stored entry.
    ///
    /// Adding an id that is already present re-selects it and adds the
    /// incoming quantity to the existing row.
    pub fn add(&mut self, product: NewProduct) -> String {
        let incoming = product.into_selected();

        if let Some(existing) = self.products.iter_mut().find(|p| p.id == incoming.id) {
            existing.selected = true;
            existing.quantity = existing.quantity.saturating_add(incoming.quantity);
            debug!(id = %existing.id, quantity = existing.quantity, "merged duplicate product");
            return existing.id.clone();
        }

        let id = incoming.id.clone();
        self.products.push(incoming);
        id
    }

    pub fn remove(&mut self, id: &str) -> Result<SelectedProduct> {
        let idx = self.position(id)?;
        Ok(self.products.remove(idx))
    }

    /// Flip the selected flag. Returns the new state.
    pub fn toggle_select(&mut self, id: &str) -> Result<bool> {
        let product = self.get_mut(id)?;
        product.selected = !product.selected;
        Ok(product.selected)
    }

    /// Set the quantity, clamping anything below 1 up to 1.
    pub fn set_quantity(&mut self, id: &str, n: i64) -> Result<u32> {
        let product = self.get_mut(id)?;
        product.quantity = clamp_quantity(n);
        Ok(product.quantity)
    }

    pub fn select_all(&mut self) {
        for p in &mut self.products {
            p.selected = true;
        }
    }

    pub fn deselect_all(&mut self) {
        for p in &mut self.products {
            p.selected = false;
        }
    }

    /// Case-insensitive substring search over name, SKU and barcode.
    pub fn filter(&self, term: &str) -> Vec<&SelectedProduct> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.products.iter().filter(|p| p.matches(&needle)).collect()
    }

    /// Selected entries only, in insertion order.
    pub fn selected(&self) -> Vec<&SelectedProduct> {
        self.products.iter().filter(|p| p.selected).collect()
    }

    /// Owned copy of the selected entries, handed to the batch orchestrator.
    pub fn snapshot(&self) -> Vec<SelectedProduct> {
        self.products.iter().filter(|p| p.selected).cloned().collect()
    }

    /// Total number of units the current selection would produce.
    pub fn total_units(&self) -> u64 {
        self.products
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.quantity as u64)
            .sum()
    }

    pub fn all(&self) -> &[SelectedProduct] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&SelectedProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| LabelkitError::NotFound(format!("product {id}")))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut SelectedProduct> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LabelkitError::NotFound(format!("product {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SelectionStore {
        let mut s = SelectionStore::new();
        s.add(NewProduct::new("Green Tea", "TEA-01").with_id("a"));
        s.add(
            NewProduct::new("Coffee Beans", "COF-02")
                .barcode("4006381333931")
                .with_id("b"),
        );
        s.add(NewProduct::new("Teapot", "POT-03").with_id("c"));
        s
    }

    #[test]
    fn test_add_preserves_order() {
        let s = store();
        let ids: Vec<_> = s.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_add_duplicate_merges() {
        let mut s = store();
        s.toggle_select("a").unwrap();
        s.add(NewProduct::new("Green Tea", "TEA-01").with_id("a").quantity(2));
        assert_eq!(s.len(), 3);
        let a = s.get("a").unwrap();
        assert!(a.selected);
        assert_eq!(a.quantity, 3);
    }

    #[test]
    fn test_quantity_clamp() {
        let mut s = store();
        assert_eq!(s.set_quantity("a", 0).unwrap(), 1);
        assert_eq!(s.get("a").unwrap().quantity, 1);
        assert_eq!(s.set_quantity("a", -5).unwrap(), 1);
        assert_eq!(s.get("a").unwrap().quantity, 1);
        assert_eq!(s.set_quantity("a", 4).unwrap(), 4);
    }

    #[test]
    fn test_unknown_id() {
        let mut s = store();
        assert!(matches!(s.remove("zzz"), Err(LabelkitError::NotFound(_))));
        assert!(matches!(
            s.set_quantity("zzz", 2),
            Err(LabelkitError::NotFound(_))
        ));
    }

    #[test]
    fn test_toggle_and_selected_order() {
        let mut s = store();
        assert!(!s.toggle_select("b").unwrap());
        let ids: Vec<_> = s.selected().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);

        s.deselect_all();
        assert!(s.selected().is_empty());
        s.select_all();
        assert_eq!(s.selected().len(), 3);
    }

    #[test]
    fn test_filter_or_combined() {
        let s = store();
        let by_name: Vec<_> = s.filter("TEA").iter().map(|p| p.id.as_str()).collect();
        // "Teapot" matches by name, "Green Tea" by name and SKU
        assert_eq!(by_name, ["a", "c"]);

        let by_barcode: Vec<_> = s.filter("333931").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(by_barcode, ["b"]);

        assert_eq!(s.filter("  ").len(), 3);
        assert!(s.filter("nothing").is_empty());
    }

    #[test]
    fn test_total_units() {
        let mut s = store();
        s.set_quantity("a", 3).unwrap();
        s.toggle_select("c").unwrap();
        assert_eq!(s.total_units(), 4);
        assert_eq!(s.snapshot().len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut s = store();
        let removed = s.remove("b").unwrap();
        assert_eq!(removed.name, "Coffee Beans");
        assert_eq!(s.len(), 2);
    }
}
