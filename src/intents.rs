//! Intents
//!
//! User actions forwarded from the presentation layer, each carrying the product id of the
//! control that raised it.

use std::str::FromStr;

use thiserror::Error;

use crate::{bundle::BundleState, products::ProductId};

/// Errors parsing an intent from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    /// The action name is not recognised.
    #[error("Unknown intent: {0}")]
    UnknownAction(String),

    /// The action needs a product id (e.g., `toggle:3`).
    #[error("Intent {0} requires a product id")]
    MissingProduct(String),
}

/// A single user action on the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// "Add to Bundle" / "Added to Bundle" card button
    Toggle(ProductId),

    /// Quantity `+` button
    Increase(ProductId),

    /// Quantity `−` button
    Decrease(ProductId),

    /// Remove button on a selected line
    Remove(ProductId),
}

impl Intent {
    /// The product the intent refers to.
    pub fn product_id(&self) -> &ProductId {
        match self {
            Intent::Toggle(id)
            | Intent::Increase(id)
            | Intent::Decrease(id)
            | Intent::Remove(id) => id,
        }
    }
}

impl FromStr for Intent {
    type Err = IntentError;

    /// Parse `action:id`, where action is one of `toggle`, `inc`, `dec` or `remove`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, id) = s.split_once(':').unwrap_or((s, ""));
        let id = id.trim();

        let make: fn(ProductId) -> Intent = match action.trim() {
            "toggle" => Intent::Toggle,
            "inc" | "increase" => Intent::Increase,
            "dec" | "decrease" => Intent::Decrease,
            "remove" => Intent::Remove,
            other => return Err(IntentError::UnknownAction(other.to_string())),
        };

        if id.is_empty() {
            return Err(IntentError::MissingProduct(action.trim().to_string()));
        }

        Ok(make(ProductId::from(id)))
    }
}

impl BundleState<'_> {
    /// Apply a user intent.
    pub fn apply(&mut self, intent: &Intent) {
        let id = intent.product_id().as_str();

        match intent {
            Intent::Toggle(_) => self.toggle(id),
            Intent::Increase(_) => self.increase_quantity(id),
            Intent::Decrease(_) => self.decrease_quantity(id),
            Intent::Remove(_) => self.remove(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        config::BundleConfig,
        products::{Catalog, Product},
    };

    use super::*;

    #[test]
    fn parses_each_action() -> Result<(), IntentError> {
        assert_eq!("toggle:1".parse::<Intent>()?, Intent::Toggle(ProductId::from("1")));
        assert_eq!("inc:2".parse::<Intent>()?, Intent::Increase(ProductId::from("2")));
        assert_eq!("decrease:3".parse::<Intent>()?, Intent::Decrease(ProductId::from("3")));
        assert_eq!("remove: 4".parse::<Intent>()?, Intent::Remove(ProductId::from("4")));

        Ok(())
    }

    #[test]
    fn rejects_unknown_action() {
        assert_eq!(
            "buy:1".parse::<Intent>(),
            Err(IntentError::UnknownAction("buy".to_string()))
        );
    }

    #[test]
    fn rejects_missing_product() {
        assert_eq!(
            "toggle".parse::<Intent>(),
            Err(IntentError::MissingProduct("toggle".to_string()))
        );
    }

    #[test]
    fn apply_routes_to_bundle_operations() -> TestResult {
        let catalog = Catalog::new(
            [Product::new("1", "Wallet", Money::from_minor(1000, USD), "")],
            USD,
        )?;
        let mut bundle = BundleState::new(catalog, BundleConfig::default());

        for intent in ["toggle:1", "inc:1", "inc:1", "dec:1"] {
            bundle.apply(&intent.parse::<Intent>()?);
        }

        assert_eq!(bundle.quantity("1").map(|q| q.get()), Some(2));

        bundle.apply(&Intent::Remove(ProductId::from("1")));

        assert!(!bundle.is_selected("1"));

        Ok(())
    }
}
