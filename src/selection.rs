//! Selection
//!
//! The products a shopper has picked for their bundle, in the order they were picked.

use std::num::NonZeroU32;

use smallvec::SmallVec;

use crate::products::ProductId;

/// One line in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    product_id: ProductId,
    quantity: NonZeroU32,
}

impl SelectionEntry {
    /// Create a new entry with a quantity of one.
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: NonZeroU32::MIN,
        }
    }

    /// The selected product.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// How many units of the product are in the bundle.
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }
}

/// Insertion-ordered map of product id to selection entry.
///
/// Quantities are never zero: decrementing a single unit removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: SmallVec<[SelectionEntry; 8]>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.product_id.as_str() == id)
    }

    /// Look up the entry for a product.
    pub fn get(&self, id: &str) -> Option<&SelectionEntry> {
        self.entries
            .iter()
            .find(|entry| entry.product_id.as_str() == id)
    }

    /// Check whether a product is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Append a product with quantity one. Returns `false` if it was already selected.
    pub fn insert(&mut self, product_id: ProductId) -> bool {
        if self.contains(product_id.as_str()) {
            return false;
        }

        self.entries.push(SelectionEntry::new(product_id));

        true
    }

    /// Remove a product, keeping the order of the remaining entries.
    pub fn remove(&mut self, id: &str) -> Option<SelectionEntry> {
        self.position(id).map(|idx| self.entries.remove(idx))
    }

    /// Add one unit, saturating at `u32::MAX`. Returns the new quantity.
    pub fn increment(&mut self, id: &str) -> Option<NonZeroU32> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.product_id.as_str() == id)?;

        entry.quantity = entry.quantity.saturating_add(1);

        Some(entry.quantity)
    }

    /// Remove one unit. A product at quantity one is dropped from the selection,
    /// in which case `Some(None)` is returned.
    pub fn decrement(&mut self, id: &str) -> Option<Option<NonZeroU32>> {
        let idx = self.position(id)?;
        let entry = self.entries.get_mut(idx)?;

        if let Some(quantity) = NonZeroU32::new(entry.quantity.get() - 1) {
            entry.quantity = quantity;

            Some(Some(quantity))
        } else {
            self.entries.remove(idx);

            Some(None)
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over the entries in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.iter()
    }

    /// Number of distinct selected products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
