//! Fixtures
//!
//! Load a catalog, pricing rules and default selection from YAML.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    bundle::BundleState,
    config::{BundleConfig, ConfigError},
    products::{Catalog, CatalogError, Product, ProductId},
};

/// Directory fixture sets are read from by [`BundleFixture::from_set`].
pub const FIXTURE_DIR: &str = "./fixtures/bundles";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Catalog could not be built
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Pricing rules are invalid
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Top-level YAML document
#[derive(Debug, Deserialize)]
pub struct BundleFixtureFile {
    /// ISO currency code of every price (e.g., "USD")
    pub currency: String,

    /// Pricing rules
    #[serde(default)]
    pub config: ConfigFixture,

    /// Products in page order
    pub products: Vec<ProductFixture>,

    /// Ids selected when the page loads
    #[serde(default)]
    pub default_selection: Vec<ProductId>,
}

/// Pricing rules in YAML
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConfigFixture {
    /// Distinct products needed to unlock the discount
    pub discount_threshold: usize,

    /// Discount rate (e.g., "30%" or "0.3")
    pub discount_rate: String,

    /// Whether checkout empties the selection
    pub clear_on_checkout: bool,
}

impl Default for ConfigFixture {
    fn default() -> Self {
        Self {
            discount_threshold: 3,
            discount_rate: "30%".to_string(),
            clear_on_checkout: false,
        }
    }
}

impl TryFrom<ConfigFixture> for BundleConfig {
    type Error = FixtureError;

    fn try_from(fixture: ConfigFixture) -> Result<Self, Self::Error> {
        let rate = parse_percentage(&fixture.discount_rate)?;

        Ok(BundleConfig::new(fixture.discount_threshold, rate)?
            .with_clear_on_checkout(fixture.clear_on_checkout))
    }
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Product price (e.g., "10.00 USD")
    pub price: String,

    /// Display asset reference
    #[serde(default)]
    pub image: String,
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Product {
            id: fixture.id,
            title: fixture.title,
            price: Money::from_minor(minor_units, currency),
            image: fixture.image,
        })
    }
}

/// A loaded bundle fixture.
#[derive(Debug, Clone)]
pub struct BundleFixture {
    catalog: Catalog<'static>,
    config: BundleConfig,
    default_selection: Vec<ProductId>,
}

impl BundleFixture {
    /// Load a named fixture set from [`FIXTURE_DIR`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_path(PathBuf::from(FIXTURE_DIR).join(format!("{name}.yml")))
    }

    /// Load a fixture from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        contents.parse()
    }

    /// The product catalog.
    pub fn catalog(&self) -> &Catalog<'static> {
        &self.catalog
    }

    /// The pricing rules.
    pub fn config(&self) -> BundleConfig {
        self.config
    }

    /// Ids selected when the page loads.
    pub fn default_selection(&self) -> &[ProductId] {
        &self.default_selection
    }

    /// Build a bundle seeded with the default selection.
    pub fn bundle(&self) -> BundleState<'static> {
        BundleState::with_selection(
            self.catalog.clone(),
            self.config,
            &self.default_selection,
        )
    }
}

impl FromStr for BundleFixture {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let file: BundleFixtureFile = serde_norway::from_str(s)?;
        let currency = parse_currency(&file.currency)?;

        let products = file
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            catalog: Catalog::new(products, currency)?,
            config: file.config.try_into()?,
            default_selection: file.default_selection,
        })
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, parse_currency(currency_code)?))
}

/// Resolve a supported ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything other than GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse percentage string (e.g., "30%" or "0.3") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a decimal.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / Decimal::ONE_HUNDRED))
    } else {
        let value = trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}
