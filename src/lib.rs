//! Bundle Builder
//!
//! Selection and pricing state for a "build your own bundle" product widget: shoppers pick
//! products from a catalog, adjust quantities, unlock a percentage discount once enough
//! distinct products are chosen, and submit the bundle to a cart.

pub mod bundle;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod intents;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod selection;
pub mod snapshot;
pub mod utils;
