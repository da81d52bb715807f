//! Checkout
//!
//! The record handed to the cart collaborator when a bundle is submitted.

use std::{
    num::NonZeroU32,
    time::{Duration, Instant},
};

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{pricing::PricingError, products::ProductId};

/// How long the "bundle added" confirmation stays on screen.
pub const CONFIRMATION_DURATION: Duration = Duration::from_secs(2);

/// Errors that can occur while submitting a bundle.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The bundle could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The cart rejected the record.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Errors raised by a cart collaborator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The cart refused the submission.
    #[error("cart rejected bundle: {0}")]
    Rejected(String),
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutItem<'a> {
    /// Purchased product
    pub product_id: ProductId,

    /// Units purchased
    pub quantity: NonZeroU32,

    /// Price of a single unit
    pub unit_price: Money<'a, Currency>,
}

/// A submitted bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRecord<'a> {
    /// Purchased lines in selection order
    pub items: Vec<CheckoutItem<'a>>,

    /// Total before the discount
    pub subtotal: Money<'a, Currency>,

    /// Discount taken off the subtotal
    pub discount: Money<'a, Currency>,

    /// Amount payable
    pub total: Money<'a, Currency>,

    /// When the bundle was submitted
    pub timestamp: Timestamp,
}

/// Receives submitted bundles.
pub trait CartSink<'a> {
    /// Accept a checkout record.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart refuses the record.
    fn submit(&mut self, record: &CheckoutRecord<'a>) -> Result<(), CartError>;
}

/// A cart that only logs what it receives.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCart;

impl<'a> CartSink<'a> for LoggingCart {
    fn submit(&mut self, record: &CheckoutRecord<'a>) -> Result<(), CartError> {
        tracing::info!(
            items = record.items.len(),
            subtotal = %record.subtotal,
            discount = %record.discount,
            total = %record.total,
            timestamp = %record.timestamp,
            "bundle added to cart"
        );

        for item in &record.items {
            tracing::debug!(
                product_id = %item.product_id,
                quantity = item.quantity.get(),
                unit_price = %item.unit_price,
                "bundle line"
            );
        }

        Ok(())
    }
}

impl<'a> CartSink<'a> for Vec<CheckoutRecord<'a>> {
    fn submit(&mut self, record: &CheckoutRecord<'a>) -> Result<(), CartError> {
        self.push(record.clone());

        Ok(())
    }
}

/// The transient confirmation shown after a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    shown_at: Instant,
}

impl Confirmation {
    /// Confirmation label text.
    pub const LABEL: &'static str = "✓ Bundle Added!";

    /// Start showing the confirmation at `shown_at`.
    pub fn new(shown_at: Instant) -> Self {
        Self { shown_at }
    }

    /// Whether the confirmation is still on screen at `now`.
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < CONFIRMATION_DURATION
    }

    /// When the previous label should be restored.
    pub fn expires_at(&self) -> Instant {
        self.shown_at + CONFIRMATION_DURATION
    }
}
