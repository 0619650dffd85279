//! Positional reassociation.
//!
//! Maps an index in a flat unit list back to the product it came from using
//! cumulative quantities: unit `i` belongs to the first product whose running
//! total exceeds `i`. Units produced by [`generate`](super::generate) carry
//! their product id directly; this rule is for consumers that only hold a
//! flat list and the selection it was generated from.

use crate::catalog::SelectedProduct;

/// Index into `quantities` of the product owning flat unit `index`.
///
/// Returns `None` when `index` is past the total quantity.
pub fn owner_of(quantities: &[u32], index: usize) -> Option<usize> {
    let mut cumulative = 0usize;
    for (product_idx, &qty) in quantities.iter().enumerate() {
        cumulative += qty as usize;
        if index < cumulative {
            return Some(product_idx);
        }
    }
    None
}

/// Owner index for every unit in `0..Σ quantities`.
pub fn owners(quantities: &[u32]) -> Vec<usize> {
    quantities
        .iter()
        .enumerate()
        .flat_map(|(idx, &qty)| std::iter::repeat_n(idx, qty as usize))
        .collect()
}

/// Convenience over a selection: the owning product of flat unit `index`.
pub fn owning_product(selected: &[SelectedProduct], index: usize) -> Option<&SelectedProduct> {
    let quantities: Vec<u32> = selected.iter().map(|p| p.quantity).collect();
    owner_of(&quantities, index).map(|idx| &selected[idx])
}
