//! Factor row lookup.

use crate::config::FactorRow;

/// Returns the first row whose inclusive age band contains `age`.
///
/// Rows are scanned in table order and the first match wins, so when bands
/// overlap the earlier-declared row takes precedence.
///
/// # Examples
///
/// ```
/// use vruchtgebruik_engine::calculation::find_factor_row;
/// use vruchtgebruik_engine::config::FactorRow;
/// use rust_decimal::Decimal;
///
/// let table = vec![
///     FactorRow { min_age: 20, max_age: 29, factor: Decimal::from(20) },
///     FactorRow { min_age: 30, max_age: 39, factor: Decimal::from(19) },
/// ];
/// assert_eq!(find_factor_row(&table, 30).map(|r| r.factor), Some(Decimal::from(19)));
/// assert!(find_factor_row(&table, 10).is_none());
/// ```
pub fn find_factor_row(table: &[FactorRow], age: i32) -> Option<&FactorRow> {
    table.iter().find(|row| row.contains(age))
}
