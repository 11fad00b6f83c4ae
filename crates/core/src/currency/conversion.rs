//! Conversion of foreign-currency amounts into the base currency.
//!
//! CRITICAL: Rounding strategy:
//! - Always round to the money scale (2 decimal places)
//! - Use banker's rounding (round half to even)

use rust_decimal::{Decimal, RoundingStrategy};

use kasse_shared::types::money::MONEY_SCALE;

/// Converts an amount into the base currency using the given rate.
///
/// The rate is expressed as units of source currency per 1 base-currency
/// unit, so the settled amount is `amount / rate`. A zero or negative rate
/// yields `None`; the caller treats that as a failed lookup.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn to_base(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    if rate <= Decimal::ZERO {
        return None;
    }
    amount.checked_div(rate).map(|converted| {
        let mut settled =
            converted.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
        // Exact divisions come back with a short scale; settled amounts always
        // carry two decimal places.
        settled.rescale(MONEY_SCALE);
        settled
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_base() {
        // 113 USD at 1.13 USD per EUR = 100 EUR
        let result = to_base(dec!(113), dec!(1.13));
        assert_eq!(result, Some(dec!(100.00)));
        assert_eq!(result.expect("converts").to_string(), "100.00");
    }

    #[test]
    fn test_to_base_rounds_to_cents() {
        // 100 / 3 = 33.333... -> 33.33
        let result = to_base(dec!(100), dec!(3));
        assert_eq!(result, Some(dec!(33.33)));
    }

    #[test]
    fn test_bankers_rounding() {
        // 0.125 / 1 -> midpoint at 2 decimals rounds to even: 0.12
        let result = to_base(dec!(0.125), dec!(1));
        assert_eq!(result, Some(dec!(0.12)));

        // 0.135 / 1 -> 0.14 (rounds to even)
        let result = to_base(dec!(0.135), dec!(1));
        assert_eq!(result, Some(dec!(0.14)));
    }

    #[test]
    fn test_zero_rate_is_rejected() {
        assert_eq!(to_base(dec!(100), Decimal::ZERO), None);
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        assert_eq!(to_base(dec!(100), dec!(-1.5)), None);
    }
}
