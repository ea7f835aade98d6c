//! Product pricing
//!
//! Sale prices are always derived from the original price and the discount
//! percentage; they are never stored on their own.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Round a monetary amount to cents
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Sale price after applying a percentage discount.
///
/// - Missing original price counts as 0.
/// - A discount that is missing, zero or outside (0, 100] leaves the
///   original price unchanged.
pub fn sale_price(original_price: Option<Decimal>, discount_percentage: Option<Decimal>) -> Decimal {
    let original = original_price.unwrap_or_default();
    let discount = discount_percentage.unwrap_or_default();

    if original > Decimal::ZERO && discount > Decimal::ZERO && discount <= Decimal::ONE_HUNDRED {
        let factor = Decimal::ONE - discount / Decimal::ONE_HUNDRED;
        return round_money(original * factor);
    }
    round_money(original)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_discount_applied() {
        assert_eq!(sale_price(Some(dec("25.00")), Some(dec("20"))), dec("20.00"));
        assert_eq!(sale_price(Some(dec("19.99")), Some(dec("15"))), dec("16.99"));
        assert_eq!(sale_price(Some(dec("10")), Some(dec("100"))), dec("0"));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 0.125 * 1 -> 0.13
        assert_eq!(round_money(dec("0.125")), dec("0.13"));
        assert_eq!(sale_price(Some(dec("10.005")), None), dec("10.01"));
    }

    #[test]
    fn test_no_or_invalid_discount_keeps_original() {
        assert_eq!(sale_price(Some(dec("12.345")), None), dec("12.35"));
        assert_eq!(sale_price(Some(dec("12")), Some(dec("0"))), dec("12"));
        assert_eq!(sale_price(Some(dec("12")), Some(dec("120"))), dec("12"));
        assert_eq!(sale_price(Some(dec("12")), Some(dec("-5"))), dec("12"));
    }

    #[test]
    fn test_missing_original_is_zero() {
        assert_eq!(sale_price(None, Some(dec("20"))), Decimal::ZERO);
        assert_eq!(sale_price(None, None), Decimal::ZERO);
    }
}
