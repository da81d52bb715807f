//! Bundle Config

use std::num::NonZeroUsize;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

/// Default number of distinct products needed to unlock the discount.
pub const DEFAULT_DISCOUNT_THRESHOLD: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(threshold) => threshold,
    None => NonZeroUsize::MIN,
};

/// Errors raised when validating bundle configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The discount threshold must be at least one product.
    #[error("discount threshold must be at least 1")]
    ZeroThreshold,

    /// The discount rate must be in `[0, 1)`.
    #[error("discount rate {0} is outside [0, 1)")]
    RateOutOfRange(Decimal),
}

/// Fixed pricing rules for a bundle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BundleConfig {
    discount_threshold: NonZeroUsize,
    discount_rate: Percentage,
    clear_on_checkout: bool,
}

impl BundleConfig {
    /// Create a new config.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroThreshold`]: `discount_threshold` is zero.
    /// - [`ConfigError::RateOutOfRange`]: `discount_rate` is negative or not below 100%.
    pub fn new(discount_threshold: usize, discount_rate: Percentage) -> Result<Self, ConfigError> {
        let discount_threshold =
            NonZeroUsize::new(discount_threshold).ok_or(ConfigError::ZeroThreshold)?;

        let rate = discount_rate * Decimal::ONE;

        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(ConfigError::RateOutOfRange(rate));
        }

        Ok(Self {
            discount_threshold,
            discount_rate,
            clear_on_checkout: false,
        })
    }

    /// Set whether a checkout empties the selection.
    #[must_use]
    pub fn with_clear_on_checkout(mut self, clear_on_checkout: bool) -> Self {
        self.clear_on_checkout = clear_on_checkout;
        self
    }

    /// Distinct products needed to unlock the discount.
    pub fn discount_threshold(&self) -> NonZeroUsize {
        self.discount_threshold
    }

    /// Fraction of the subtotal taken off once the threshold is met.
    pub fn discount_rate(&self) -> Percentage {
        self.discount_rate
    }

    /// The discount rate as a plain decimal fraction.
    pub fn discount_rate_decimal(&self) -> Decimal {
        self.discount_rate * Decimal::ONE
    }

    /// Whether a checkout empties the selection.
    pub fn clear_on_checkout(&self) -> bool {
        self.clear_on_checkout
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            discount_threshold: DEFAULT_DISCOUNT_THRESHOLD,
            discount_rate: Percentage::from(Decimal::new(3, 1)),
            clear_on_checkout: false,
        }
    }
}
