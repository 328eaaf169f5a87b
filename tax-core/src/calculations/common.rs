//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used across the federal and state
//! rules and the form mappers, including rounding and other common operations.

use rust_decimal::Decimal;

/// Drops cents, rounding toward negative infinity.
///
/// Every currency amount that enters a tax calculation passes through this
/// function at the point where it is used.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_dollars;
///
/// assert_eq!(floor_dollars(dec!(1471.38)), dec!(1471));
/// assert_eq!(floor_dollars(dec!(999.99)), dec!(999));
/// assert_eq!(floor_dollars(dec!(12)), dec!(12));
/// ```
pub fn floor_dollars(value: Decimal) -> Decimal {
    value.floor()
}

/// Sums `values` and floors the total.
pub fn floor_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    floor_dollars(values.into_iter().sum())
}

/// Floors each of `values` before summing them.
pub fn sum_floored<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().map(floor_dollars).sum()
}

/// Rounds to cents, midpoints away from zero. Used where an amount is printed
/// with cents rather than floored to dollars.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(306.045)), dec!(306.05));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// The larger of `a` and `b`.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
