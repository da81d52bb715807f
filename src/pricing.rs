//! Pricing

use std::num::NonZeroU32;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while pricing a bundle.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line total or subtotal did not fit in minor units.
    #[error("amount overflowed minor units")]
    Overflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Price of `quantity` units at `price` each.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn line_total<'a>(
    price: &Money<'a, Currency>,
    quantity: NonZeroU32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity.get()))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Sum of `price × quantity` over every line.
///
/// An empty set of lines is zero in `currency`.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line total or the running sum does not fit in minor units.
/// - [`PricingError::Money`]: a line is in a different currency.
pub fn subtotal<'a, 'p>(
    lines: impl IntoIterator<Item = (&'p Money<'a, Currency>, NonZeroU32)>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError>
where
    'a: 'p,
{
    let (total, _minor) = lines.into_iter().try_fold(
        (Money::from_minor(0, currency), 0_i64),
        |(acc, minor), (price, quantity)| -> Result<_, PricingError> {
            let line = line_total(price, quantity)?;
            let minor = minor
                .checked_add(line.to_minor_units())
                .ok_or(PricingError::Overflow)?;

            Ok((acc.add(line)?, minor))
        },
    )?;

    Ok(total)
}

/// The share of `amount` given by `percent`, rounded to the nearest minor unit.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: `amount` does not fit in minor units.
/// - [`PricingError::PercentConversion`]: the result cannot be represented.
pub fn percentage_of<'a>(
    amount: &Money<'a, Currency>,
    percent: &Percentage,
) -> Result<Money<'a, Currency>, PricingError> {
    let amount_minor = amount.to_minor_units();

    // to_minor_units does not report out-of-range amounts
    if Money::from_minor(amount_minor, amount.currency()) != *amount {
        return Err(PricingError::Overflow);
    }

    let minor = percent_of_minor(percent, amount_minor)?;

    Ok(Money::from_minor(minor, amount.currency()))
}

/// Calculate a percentage of a minor unit amount, rounding midpoints away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the multiplication overflows or the
/// result does not fit in an `i64`.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
    }

    #[test]
    fn line_total_multiplies_price() -> TestResult {
        let price = Money::from_minor(1000, USD);

        assert_eq!(line_total(&price, qty(3))?, Money::from_minor(3000, USD));

        Ok(())
    }

    #[test]
    fn line_total_overflow_errors() {
        let price = Money::from_minor(i64::MAX, USD);

        assert_eq!(line_total(&price, qty(2)), Err(PricingError::Overflow));
    }

    #[test]
    fn subtotal_sums_lines() -> TestResult {
        let a = Money::from_minor(1000, USD);
        let b = Money::from_minor(2000, USD);

        let total = subtotal([(&a, qty(2)), (&b, qty(1))], USD)?;

        assert_eq!(total, Money::from_minor(4000, USD));

        Ok(())
    }

    #[test]
    fn subtotal_empty_is_zero() -> TestResult {
        let total = subtotal([], USD)?;

        assert_eq!(total, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn subtotal_overflow_across_lines_errors() {
        let a = Money::from_minor(i64::MAX, USD);
        let b = Money::from_minor(i64::MAX, USD);

        let result = subtotal([(&a, qty(1)), (&b, qty(1))], USD);

        assert_eq!(result, Err(PricingError::Overflow));
    }

    #[test]
    fn percentage_of_out_of_range_amount_errors() -> TestResult {
        let max = Money::from_minor(i64::MAX, USD);
        let amount = max.add(Money::from_minor(i64::MAX, USD))?;
        let percent = Percentage::from(Decimal::new(3, 1));

        assert_eq!(percentage_of(&amount, &percent), Err(PricingError::Overflow));

        Ok(())
    }

    #[test]
    fn subtotal_currency_mismatch_errors() {
        let a = Money::from_minor(1000, GBP);

        let result = subtotal([(&a, qty(1))], USD);

        assert!(matches!(result, Err(PricingError::Money(_))));
    }

    #[test]
    fn percentage_of_rounds_half_away_from_zero() -> TestResult {
        let amount = Money::from_minor(4505, USD);
        let percent = Percentage::from(Decimal::new(3, 1));

        // 1351.5 rounds up
        assert_eq!(percentage_of(&amount, &percent)?, Money::from_minor(1352, USD));

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let percent = Percentage::from(Decimal::new(2, 0));
        let result = percent_of_minor(&percent, i64::MAX);

        assert_eq!(result, Err(PricingError::PercentConversion));
    }
}
