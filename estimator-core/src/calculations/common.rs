//! Common utility functions for estimate calculations.
//!
//! This module provides shared functionality used across the pricing and
//! assessment calculations, including rounding and percentage helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to a whole currency unit using half-up rounding.
///
/// Values at exactly .5 are rounded away from zero, which matches the way
/// amounts are rounded on the website.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimator_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(123.4)), dec!(123));
/// assert_eq!(round_whole(dec!(123.5)), dec!(124));
/// assert_eq!(round_whole(dec!(-123.5)), dec!(-124)); // Away from zero
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `part` as a percentage of `whole`, rounded to one decimal place.
///
/// Returns zero when `whole` is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimator_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(45), dec!(100)), dec!(45.0));
/// assert_eq!(percent_of(dec!(1), dec!(3)), dec!(33.3));
/// assert_eq!(percent_of(dec!(5), dec!(0)), dec!(0));
/// ```
pub fn percent_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / whole)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
