//! Usage value arithmetic.
//!
//! The yearly yield of an asset is fixed at 4% of its value; the usage value
//! is that yield multiplied by the age-band factor, rounded to whole units.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Returns the yearly yield rate applied to the asset value (4%).
pub fn usage_rate() -> Decimal {
    Decimal::new(4, 2)
}

/// Calculates `asset_value * 0.04 * factor`, rounded to zero decimal places
/// with midpoints rounded away from zero.
///
/// All arithmetic is exact decimal arithmetic. Overflow of the decimal range
/// is reported as a `CalculationError`.
///
/// # Examples
///
/// ```
/// use vruchtgebruik_engine::calculation::calculate_usage_value;
/// use rust_decimal::Decimal;
///
/// let value = calculate_usage_value(1000, Decimal::from(19)).unwrap();
/// assert_eq!(value, Decimal::from(760));
///
/// // 1000 * 0.04 * 0.0125 = 0.5 rounds up, not to even
/// let value = calculate_usage_value(1000, Decimal::new(125, 4)).unwrap();
/// assert_eq!(value, Decimal::ONE);
/// ```
pub fn calculate_usage_value(asset_value: i64, factor: Decimal) -> EngineResult<Decimal> {
    Decimal::from(asset_value)
        .checked_mul(usage_rate())
        .and_then(|yearly_yield| yearly_yield.checked_mul(factor))
        .map(|raw| raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!(
                "usage value overflow for asset value {} and factor {}",
                asset_value, factor
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_usage_rate_is_four_percent() {
        assert_eq!(usage_rate(), dec("0.04"));
    }

    #[test]
    fn test_whole_factor() {
        assert_eq!(calculate_usage_value(1000, dec("19")).unwrap(), dec("760"));
        assert_eq!(
            calculate_usage_value(250_000, dec("22")).unwrap(),
            dec("220000")
        );
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        // 1000 * 0.04 * 0.0125 = 0.5
        assert_eq!(calculate_usage_value(1000, dec("0.0125")).unwrap(), dec("1"));
        // 1000 * 0.04 * 0.0625 = 2.5, banker's rounding would give 2
        assert_eq!(calculate_usage_value(1000, dec("0.0625")).unwrap(), dec("3"));
        // negative factors round away from zero as well
        assert_eq!(
            calculate_usage_value(1000, dec("-0.0625")).unwrap(),
            dec("-3")
        );
    }

    #[test]
    fn test_below_midpoint_rounds_down() {
        // 1234 * 0.04 * 1.5 = 74.04
        assert_eq!(calculate_usage_value(1234, dec("1.5")).unwrap(), dec("74"));
    }

    #[test]
    fn test_overflow_is_calculation_error() {
        let result = calculate_usage_value(i64::MAX, Decimal::MAX);
        assert!(matches!(
            result,
            Err(EngineError::CalculationError { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_result_is_whole_and_within_half_unit(
            asset_value in 1i64..=100_000_000,
            factor_hundredths in 0i64..=3_000,
        ) {
            let factor = Decimal::new(factor_hundredths, 2);
            let exact = Decimal::from(asset_value) * usage_rate() * factor;
            let rounded = calculate_usage_value(asset_value, factor).unwrap();

            prop_assert_eq!(rounded.fract(), Decimal::ZERO);
            prop_assert!((rounded - exact).abs() <= Decimal::new(5, 1));
        }

        #[test]
        fn prop_calculation_is_deterministic(
            asset_value in 1i64..=1_000_000_000,
            factor_hundredths in 0i64..=3_000,
        ) {
            let factor = Decimal::new(factor_hundredths, 2);
            prop_assert_eq!(
                calculate_usage_value(asset_value, factor).unwrap(),
                calculate_usage_value(asset_value, factor).unwrap()
            );
        }
    }
}
