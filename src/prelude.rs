//! Bundle builder prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bundle::BundleState,
    checkout::{
        CONFIRMATION_DURATION, CartError, CartSink, CheckoutError, CheckoutItem, CheckoutRecord,
        Confirmation, LoggingCart,
    },
    config::{BundleConfig, ConfigError},
    fixtures::{BundleFixture, FixtureError},
    intents::{Intent, IntentError},
    pricing::PricingError,
    products::{Catalog, CatalogError, Product, ProductId},
    selection::{Selection, SelectionEntry},
    snapshot::{BundleSnapshot, CallToAction, SnapshotError, SnapshotLine},
};
