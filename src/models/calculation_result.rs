//! Calculation result model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The outcome of a successful usage value calculation.
///
/// Decimals are written as JSON numbers carrying the exact decimal digits,
/// so values beyond the `f64` range of exact integers survive the round trip.
///
/// # Example
///
/// ```
/// use vruchtgebruik_engine::models::CalculationResult;
/// use rust_decimal::Decimal;
///
/// let result = CalculationResult {
///     asset_value: Decimal::from(1000),
///     used_factor: Decimal::from(19),
///     usage_value: Decimal::from(760),
/// };
/// let json = serde_json::to_string(&result).unwrap();
/// assert_eq!(json, r#"{"assetValue":1000,"usedFactor":19,"usageValue":760}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// The asset value provided in the request.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub asset_value: Decimal,
    /// The factor of the matched age band.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub used_factor: Decimal,
    /// The usage value, rounded to whole units.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub usage_value: Decimal,
}
