//! Property tests over random sequences of bundle intents.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, GBP},
};

use bundle_builder::prelude::*;

const IDS: [&str; 6] = ["p1", "p2", "p3", "p4", "p5", "p6"];
const PRICES: [i64; 6] = [199, 1000, 0, 2499, 350, 1275];

fn catalog() -> Result<Catalog<'static>, TestCaseError> {
    let products = IDS
        .iter()
        .zip(PRICES)
        .map(|(id, minor)| {
            Product::new(*id, id.to_uppercase(), Money::from_minor(minor, GBP), "")
        });

    Catalog::new(products, GBP).map_err(|err| TestCaseError::fail(err.to_string()))
}

fn arb_id() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(IDS.to_vec()).prop_map(str::to_string),
        1 => "[a-z]{1,3}",
    ]
}

fn arb_intent() -> impl Strategy<Value = Intent> {
    arb_id().prop_flat_map(|id| {
        prop_oneof![
            Just(Intent::Toggle(ProductId::from(id.clone()))),
            Just(Intent::Increase(ProductId::from(id.clone()))),
            Just(Intent::Decrease(ProductId::from(id.clone()))),
            Just(Intent::Remove(ProductId::from(id))),
        ]
    })
}

fn arb_config() -> impl Strategy<Value = BundleConfig> {
    (1usize..=5, 0i64..100).prop_filter_map("valid config", |(threshold, points)| {
        BundleConfig::new(
            threshold,
            decimal_percentage::Percentage::from(Decimal::new(points, 2)),
        )
        .ok()
    })
}

fn minor(result: Result<Money<'_, Currency>, PricingError>) -> Result<i64, TestCaseError> {
    result
        .map(|money| money.to_minor_units())
        .map_err(|err| TestCaseError::fail(err.to_string()))
}

fn expected_subtotal(bundle: &BundleState<'_>) -> i64 {
    bundle
        .selection()
        .iter()
        .filter_map(|entry| {
            bundle
                .catalog()
                .get(entry.product_id().as_str())
                .map(|p| p.price.to_minor_units() * i64::from(entry.quantity().get()))
        })
        .sum()
}

proptest! {
    #[test]
    fn subtotal_matches_sum_after_any_sequence(
        config in arb_config(),
        intents in prop::collection::vec(arb_intent(), 0..40),
    ) {
        let mut bundle = BundleState::new(catalog()?, config);

        for intent in &intents {
            bundle.apply(intent);

            prop_assert_eq!(minor(bundle.subtotal())?, expected_subtotal(&bundle));
        }
    }

    #[test]
    fn selection_invariants_hold(
        config in arb_config(),
        intents in prop::collection::vec(arb_intent(), 0..40),
    ) {
        let mut bundle = BundleState::new(catalog()?, config);

        for intent in &intents {
            bundle.apply(intent);

            for entry in bundle.selection().iter() {
                prop_assert!(bundle.catalog().contains(entry.product_id().as_str()));
                prop_assert!(entry.quantity().get() >= 1);
            }

            let progress = bundle.progress_fraction();
            prop_assert!(progress >= Decimal::ZERO && progress <= Decimal::ONE);
        }
    }

    #[test]
    fn discount_only_at_threshold(
        config in arb_config(),
        intents in prop::collection::vec(arb_intent(), 0..40),
    ) {
        let mut bundle = BundleState::new(catalog()?, config);

        for intent in &intents {
            bundle.apply(intent);
        }

        let applies = bundle.selected_count() >= config.discount_threshold().get();
        prop_assert_eq!(bundle.discount_applies(), applies);

        let discount = minor(bundle.discount())?;
        let subtotal = minor(bundle.subtotal())?;
        let total = minor(bundle.total())?;

        if !applies {
            prop_assert_eq!(discount, 0);
        }

        prop_assert!(discount >= 0 && discount <= subtotal);
        prop_assert_eq!(total, subtotal - discount);
    }

    #[test]
    fn toggle_twice_round_trips(
        intents in prop::collection::vec(arb_intent(), 0..20),
        id in prop::sample::select(IDS.to_vec()),
    ) {
        let mut bundle = BundleState::new(catalog()?, BundleConfig::default());

        for intent in &intents {
            bundle.apply(intent);
        }

        prop_assume!(!bundle.is_selected(id));

        let before = bundle.selection().clone();

        bundle.toggle(id);
        bundle.toggle(id);

        prop_assert_eq!(bundle.selection(), &before);
    }

    #[test]
    fn decrease_steps_down_by_one(
        id in prop::sample::select(IDS.to_vec()),
        extra in 0u32..10,
    ) {
        let mut bundle = BundleState::new(catalog()?, BundleConfig::default());

        bundle.add(id);

        for _ in 0..extra {
            bundle.increase_quantity(id);
        }

        bundle.decrease_quantity(id);

        if extra == 0 {
            prop_assert!(!bundle.is_selected(id));
        } else {
            prop_assert_eq!(bundle.quantity(id).map(|q| q.get()), Some(extra));
        }
    }
}
