//! Money helpers using rust_decimal for precision
//!
//! Revenue is summed as `Decimal` and only converted to `f64` (rounded to two
//! decimal places) when it leaves the engine.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Convert Decimal to f64 for the report, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_else(|| {
            tracing::error!(value = %value, "Decimal not representable as f64, defaulting to zero");
            0.0
        })
}

/// `a + b`, saturating at the `Decimal` bounds
pub fn add_saturating(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        tracing::warn!(%a, %b, "Money sum overflows, saturating");
        if b.is_sign_negative() { Decimal::MIN } else { Decimal::MAX }
    })
}

/// Sum of `values`; never panics on overflow
pub fn sum_saturating(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, add_saturating)
}

/// `numerator / count`, zero when `count == 0`
#[inline]
pub fn safe_average(numerator: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(Decimal::from(count))
        .unwrap_or(Decimal::ZERO)
}
