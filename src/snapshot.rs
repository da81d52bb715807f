//! Snapshot
//!
//! The immutable view of a bundle handed to the presentation layer after every change.

use std::{
    fmt, io,
    num::{NonZeroU32, NonZeroUsize},
};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{config::BundleConfig, products::Product};

/// Errors that can occur when rendering a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Writing to the output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One selected product with its quantity and line total.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotLine<'a> {
    /// The selected product
    pub product: Product<'a>,

    /// Units in the bundle
    pub quantity: NonZeroU32,

    /// `price × quantity`
    pub line_total: Money<'a, Currency>,
}

/// Label state for the main call-to-action control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallToAction {
    /// More distinct products are needed before the discount unlocks.
    ItemsNeeded(NonZeroUsize),

    /// The threshold is met and the bundle can be added.
    Ready,
}

impl fmt::Display for CallToAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallToAction::ItemsNeeded(n) => write!(f, "Add {n} Items to Proceed"),
            CallToAction::Ready => f.write_str("Added to Cart"),
        }
    }
}

/// Derived pricing state of a bundle at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleSnapshot<'a> {
    lines: Vec<SnapshotLine<'a>>,
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    discount_applies: bool,
    progress: Decimal,
    config: BundleConfig,
}

impl<'a> BundleSnapshot<'a> {
    /// Create a snapshot from already-derived values.
    pub fn new(
        lines: Vec<SnapshotLine<'a>>,
        subtotal: Money<'a, Currency>,
        discount: Money<'a, Currency>,
        total: Money<'a, Currency>,
        discount_applies: bool,
        progress: Decimal,
        config: BundleConfig,
    ) -> Self {
        Self {
            lines,
            subtotal,
            discount,
            total,
            discount_applies,
            progress,
            config,
        }
    }

    /// Selected lines in selection order.
    pub fn lines(&self) -> &[SnapshotLine<'a>] {
        &self.lines
    }

    /// Sum of every line total.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount taken off the subtotal.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Whether enough distinct products are selected for the discount.
    pub fn discount_applies(&self) -> bool {
        self.discount_applies
    }

    /// Progress toward the discount threshold in `[0, 1]`.
    pub fn progress_fraction(&self) -> Decimal {
        self.progress
    }

    /// Progress toward the discount threshold in percent points, to two places.
    pub fn progress_percent(&self) -> Decimal {
        (self.progress * Decimal::ONE_HUNDRED).round_dp(2).normalize()
    }

    /// Number of distinct selected products.
    pub fn selected_count(&self) -> usize {
        self.lines.len()
    }

    /// Distinct products still needed to unlock the discount.
    pub fn items_remaining(&self) -> usize {
        self.config
            .discount_threshold()
            .get()
            .saturating_sub(self.lines.len())
    }

    /// State of the main call-to-action control.
    pub fn call_to_action(&self) -> CallToAction {
        NonZeroUsize::new(self.items_remaining())
            .map_or(CallToAction::Ready, CallToAction::ItemsNeeded)
    }

    /// Discount line text, e.g. `- $13.50 (30%)`.
    pub fn discount_label(&self) -> String {
        let points = (self.config.discount_rate_decimal() * Decimal::ONE_HUNDRED).normalize();

        format!("- {} ({points}%)", self.discount)
    }

    /// Render the snapshot as a table followed by the pricing summary.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SnapshotError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Unit Price", "Qty", "Line Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.product.title.clone(),
                format!("{}", line.product.price),
                line.quantity.to_string(),
                format!("{}", line.line_total),
            ]);
        }

        let mut table = builder.build();

        table
            .with(Style::modern_rounded())
            .modify(Columns::new(2..5), Alignment::right())
            .modify(Rows::first(), Alignment::center());

        writeln!(out, "\n{table}")?;
        writeln!(out, " Progress: {}%", self.progress_percent())?;
        writeln!(out, " Subtotal: {}", self.subtotal)?;

        if self.discount_applies {
            writeln!(out, " Discount: {}", self.discount_label())?;
        }

        writeln!(out, " Total:    {}", self.total)?;
        writeln!(out, "\n [ {} ]", self.call_to_action())?;

        Ok(())
    }
}
