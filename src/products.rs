//! Products

use std::{borrow::Borrow, fmt};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Stable identifier attached to every rendered product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Display asset reference
    pub image: String,
}

impl<'a> Product<'a> {
    /// Create a new product.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: Money<'a, Currency>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            image: image.into(),
        }
    }
}

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share the same id.
    #[error("Duplicate product id {0}")]
    DuplicateProduct(ProductId),

    /// A product has a price below zero.
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A product's currency differs from the catalog currency.
    ///
    /// Carries the product id, the product currency and the catalog currency.
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// Read-only product reference data, in page order.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    keys: FxHashMap<ProductId, ProductKey>,
    order: Vec<ProductKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog for the given currency.
    #[must_use]
    pub fn empty(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            keys: FxHashMap::default(),
            order: Vec::new(),
            currency,
        }
    }

    /// Create a catalog from the given products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if an id repeats, a price is negative, or a
    /// price is not in the catalog currency.
    pub fn new(
        products: impl IntoIterator<Item = Product<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty(currency);

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    fn insert(&mut self, product: Product<'a>) -> Result<(), CatalogError> {
        if self.keys.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if product.price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice(product.id));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.keys.insert(id, key);
        self.order.push(key);

        Ok(())
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product<'a>> {
        self.keys
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Check whether the catalog contains a product id.
    pub fn contains(&self, id: &str) -> bool {
        self.keys.contains_key(id)
    }

    /// Iterate over the products in page order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currency used for every product price.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    fn test_products<'a>() -> [Product<'a>; 3] {
        [
            Product::new("1", "Wallet", Money::from_minor(1000, USD), "/img/1.png"),
            Product::new("2", "Belt", Money::from_minor(2000, USD), "/img/2.png"),
            Product::new("3", "Keyring", Money::from_minor(1500, USD), "/img/3.png"),
        ]
    }

    #[test]
    fn new_keeps_page_order() -> TestResult {
        let catalog = Catalog::new(test_products(), USD)?;

        let ids: Vec<&str> = catalog.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.currency(), USD);

        Ok(())
    }

    #[test]
    fn get_by_id() -> TestResult {
        let catalog = Catalog::new(test_products(), USD)?;

        let belt = catalog.get("2").map(|p| p.title.as_str());

        assert_eq!(belt, Some("Belt"));
        assert!(catalog.contains("3"));
        assert!(catalog.get("missing").is_none());

        Ok(())
    }

    #[test]
    fn duplicate_ids_error() {
        let products = [
            Product::new("1", "Wallet", Money::from_minor(1000, USD), ""),
            Product::new("1", "Wallet Again", Money::from_minor(1000, USD), ""),
        ];

        let result = Catalog::new(products, USD);

        assert!(matches!(
            result,
            Err(CatalogError::DuplicateProduct(id)) if id.as_str() == "1"
        ));
    }

    #[test]
    fn currency_mismatch_errors() {
        let products = [
            Product::new("1", "Wallet", Money::from_minor(1000, USD), ""),
            Product::new("2", "Belt", Money::from_minor(1000, GBP), ""),
        ];

        let result = Catalog::new(products, USD);

        match result {
            Err(CatalogError::CurrencyMismatch(id, product_currency, catalog_currency)) => {
                assert_eq!(id.as_str(), "2");
                assert_eq!(product_currency, GBP.iso_alpha_code);
                assert_eq!(catalog_currency, USD.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn negative_price_errors() {
        let products = [Product::new("1", "Refund", Money::from_minor(-1, USD), "")];

        assert_eq!(
            Catalog::new(products, USD).err(),
            Some(CatalogError::NegativePrice(ProductId::from("1")))
        );
    }

    #[test]
    fn zero_price_is_allowed() -> TestResult {
        let products = [Product::new("1", "Gift Box", Money::from_minor(0, USD), "")];

        let catalog = Catalog::new(products, USD)?;

        assert!(!catalog.is_empty());

        Ok(())
    }
}
