//! Bundle State
//!
//! Tracks which catalog products the shopper has picked, how many of each, and derives the
//! prices shown alongside the bundle.
//!
//! Every intent that names an id missing from the catalog (or, for quantity changes, missing
//! from the selection) is ignored. Callers only forward ids taken from the rendered catalog.

use std::{num::NonZeroU32, time::Instant};

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    checkout::{CartSink, CheckoutError, CheckoutItem, CheckoutRecord, Confirmation},
    config::BundleConfig,
    pricing::{self, PricingError},
    products::{Catalog, Product},
    selection::Selection,
    snapshot::{BundleSnapshot, SnapshotLine},
};

/// Selection-and-pricing state for one bundle builder.
#[derive(Debug, Clone)]
pub struct BundleState<'a> {
    catalog: Catalog<'a>,
    selection: Selection,
    config: BundleConfig,
}

impl<'a> BundleState<'a> {
    /// Create a bundle with nothing selected.
    pub fn new(catalog: Catalog<'a>, config: BundleConfig) -> Self {
        Self {
            catalog,
            selection: Selection::new(),
            config,
        }
    }

    /// Create a bundle with the given products pre-selected at quantity one.
    ///
    /// Ids missing from the catalog are skipped and repeated ids are selected once.
    pub fn with_selection<I>(catalog: Catalog<'a>, config: BundleConfig, defaults: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut bundle = Self::new(catalog, config);

        for id in defaults {
            let id = id.as_ref();

            if !bundle.catalog.contains(id) {
                tracing::warn!(product_id = id, "default selection not in catalog");

                continue;
            }

            bundle.add(id);
        }

        bundle
    }

    /// Select a product if it is not selected, otherwise drop it.
    pub fn toggle(&mut self, id: &str) {
        if self.selection.contains(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }

    /// Select a product at quantity one. Does nothing if it is already selected.
    pub fn add(&mut self, id: &str) {
        let Some(product) = self.catalog.get(id) else {
            tracing::debug!(product_id = id, "ignoring add for unknown product");

            return;
        };

        if self.selection.insert(product.id.clone()) {
            tracing::debug!(product_id = id, selected = self.selection.len(), "added product");
        }
    }

    /// Drop a product from the bundle.
    pub fn remove(&mut self, id: &str) {
        if self.selection.remove(id).is_some() {
            tracing::debug!(product_id = id, selected = self.selection.len(), "removed product");
        }
    }

    /// Add one unit of a selected product.
    pub fn increase_quantity(&mut self, id: &str) {
        if let Some(quantity) = self.selection.increment(id) {
            tracing::debug!(product_id = id, quantity = quantity.get(), "increased quantity");
        }
    }

    /// Remove one unit of a selected product, dropping it from the bundle at zero.
    pub fn decrease_quantity(&mut self, id: &str) {
        match self.selection.decrement(id) {
            Some(Some(quantity)) => {
                tracing::debug!(product_id = id, quantity = quantity.get(), "decreased quantity");
            }
            Some(None) => {
                tracing::debug!(
                    product_id = id,
                    selected = self.selection.len(),
                    "removed product"
                );
            }
            None => {}
        }
    }

    /// Check whether a product is in the bundle.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Units of a product in the bundle.
    pub fn quantity(&self, id: &str) -> Option<NonZeroU32> {
        self.selection.get(id).map(|entry| entry.quantity())
    }

    /// Number of distinct selected products.
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Distinct products still needed to unlock the discount.
    pub fn items_remaining(&self) -> usize {
        self.config
            .discount_threshold()
            .get()
            .saturating_sub(self.selection.len())
    }

    /// Selected products and quantities in selection order.
    pub fn lines(&self) -> impl Iterator<Item = (&Product<'a>, NonZeroU32)> {
        self.selection.iter().filter_map(|entry| {
            self.catalog
                .get(entry.product_id().as_str())
                .map(|product| (product, entry.quantity()))
        })
    }

    /// Sum of `price × quantity` over the selection.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line total overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        pricing::subtotal(
            self.lines().map(|(product, quantity)| (&product.price, quantity)),
            self.catalog.currency(),
        )
    }

    /// Whether enough distinct products are selected to unlock the discount.
    ///
    /// Quantities do not count toward the threshold.
    pub fn discount_applies(&self) -> bool {
        self.selection.len() >= self.config.discount_threshold().get()
    }

    /// Amount taken off the subtotal, zero below the threshold.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal or percentage cannot be calculated.
    pub fn discount(&self) -> Result<Money<'a, Currency>, PricingError> {
        self.discount_on(&self.subtotal()?)
    }

    fn discount_on(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        if self.discount_applies() {
            pricing::percentage_of(subtotal, &self.config.discount_rate())
        } else {
            Ok(Money::from_minor(0, self.catalog.currency()))
        }
    }

    /// Subtotal less discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal or discount cannot be calculated.
    pub fn total(&self) -> Result<Money<'a, Currency>, PricingError> {
        let subtotal = self.subtotal()?;
        let discount = self.discount_on(&subtotal)?;

        Ok(subtotal.sub(discount)?)
    }

    /// Progress toward the discount threshold, clamped to `[0, 1]`.
    pub fn progress_fraction(&self) -> Decimal {
        let selected = Decimal::from(self.selection.len());
        let threshold = Decimal::from(self.config.discount_threshold().get());

        (selected / threshold).min(Decimal::ONE)
    }

    /// Everything the presentation layer needs to render the bundle.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any price cannot be calculated.
    pub fn snapshot(&self) -> Result<BundleSnapshot<'a>, PricingError> {
        let lines = self
            .lines()
            .map(|(product, quantity)| -> Result<_, PricingError> {
                Ok(SnapshotLine {
                    product: product.clone(),
                    quantity,
                    line_total: pricing::line_total(&product.price, quantity)?,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        let subtotal = self.subtotal()?;
        let discount = self.discount_on(&subtotal)?;
        let total = subtotal.sub(discount)?;

        Ok(BundleSnapshot::new(
            lines,
            subtotal,
            discount,
            total,
            self.discount_applies(),
            self.progress_fraction(),
            self.config,
        ))
    }

    /// Capture the bundle for the cart, stamped with the current time.
    ///
    /// The selection is kept unless the config asks for it to be cleared.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any price cannot be calculated.
    pub fn checkout(&mut self) -> Result<CheckoutRecord<'a>, PricingError> {
        self.checkout_at(Timestamp::now())
    }

    /// Capture the bundle for the cart with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any price cannot be calculated.
    pub fn checkout_at(
        &mut self,
        timestamp: Timestamp,
    ) -> Result<CheckoutRecord<'a>, PricingError> {
        let record = self.record(timestamp)?;

        self.after_checkout();

        Ok(record)
    }

    /// Check out at `timestamp` and hand the record to `cart`, returning the confirmation
    /// shown from `now`.
    ///
    /// The selection is only cleared (when configured) once the cart accepts the record.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if pricing fails or the cart rejects the record.
    pub fn checkout_into(
        &mut self,
        cart: &mut impl CartSink<'a>,
        timestamp: Timestamp,
        now: Instant,
    ) -> Result<Confirmation, CheckoutError> {
        let record = self.record(timestamp)?;

        cart.submit(&record)?;

        self.after_checkout();

        Ok(Confirmation::new(now))
    }

    fn record(&self, timestamp: Timestamp) -> Result<CheckoutRecord<'a>, PricingError> {
        let items = self
            .lines()
            .map(|(product, quantity)| CheckoutItem {
                product_id: product.id.clone(),
                quantity,
                unit_price: product.price,
            })
            .collect();

        let subtotal = self.subtotal()?;
        let discount = self.discount_on(&subtotal)?;
        let total = subtotal.sub(discount)?;

        Ok(CheckoutRecord {
            items,
            subtotal,
            discount,
            total,
            timestamp,
        })
    }

    fn after_checkout(&mut self) {
        if self.config.clear_on_checkout() {
            tracing::debug!(cleared = self.selection.len(), "clearing selection after checkout");

            self.selection.clear();
        }
    }

    /// The catalog the bundle draws from.
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// The current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The pricing rules.
    pub fn config(&self) -> &BundleConfig {
        &self.config
    }
}
