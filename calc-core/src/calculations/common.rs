//! Common utility functions for calculator kernels.
//!
//! This module provides shared functionality used across multiple
//! calculators: money rounding, exponentiation with overflow checks, and
//! the domain guards most forms apply to their inputs.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

use crate::error::{CalcResult, ValidationError};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Rounds an `f64` to `places` decimal places, half away from zero.
/// Values too large to scale have no fractional digits and pass through.
pub fn round_f64(
    value: f64,
    places: u32,
) -> f64 {
    let scale = 10f64.powi(places.min(300) as i32);
    let scaled = value * scale;
    if scaled.is_finite() {
        scaled.round() / scale
    } else {
        value
    }
}

/// The rejection for arithmetic that overflows `Decimal`.
pub fn too_large(field: &str) -> ValidationError {
    ValidationError::invalid(field, "value is too large to compute")
}

/// `a * b`, reporting overflow against `field`.
pub fn checked_mul(
    a: Decimal,
    b: Decimal,
    field: &str,
) -> CalcResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| too_large(field))
}

/// `a / b`, reporting overflow against `field`. Callers reject zero
/// divisors themselves so they can word the message.
pub fn checked_div(
    a: Decimal,
    b: Decimal,
    field: &str,
) -> CalcResult<Decimal> {
    a.checked_div(b).ok_or_else(|| too_large(field))
}

/// `a + b`, reporting overflow against `field`.
pub fn checked_add(
    a: Decimal,
    b: Decimal,
    field: &str,
) -> CalcResult<Decimal> {
    a.checked_add(b).ok_or_else(|| too_large(field))
}

/// `a - b`, reporting overflow against `field`.
pub fn checked_sub(
    a: Decimal,
    b: Decimal,
    field: &str,
) -> CalcResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| too_large(field))
}

/// `base^exp` for an integer exponent, reporting overflow against `field`.
pub fn checked_powi(
    base: Decimal,
    exp: i64,
    field: &str,
) -> CalcResult<Decimal> {
    base.checked_powi(exp).ok_or_else(|| too_large(field))
}

/// `base^exp` for a fractional exponent, reporting overflow against `field`.
pub fn checked_powd(
    base: Decimal,
    exp: Decimal,
    field: &str,
) -> CalcResult<Decimal> {
    base.checked_powd(exp).ok_or_else(|| too_large(field))
}

/// Rejects zero and negative values.
pub fn ensure_positive(
    value: Decimal,
    field: &str,
) -> CalcResult<Decimal> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(ValidationError::invalid(field, "must be greater than zero"))
    }
}

/// Rejects negative values.
pub fn ensure_non_negative(
    value: Decimal,
    field: &str,
) -> CalcResult<Decimal> {
    if value >= Decimal::ZERO {
        Ok(value)
    } else {
        Err(ValidationError::invalid(field, "must not be negative"))
    }
}

/// Rejects zero, negative and non-finite floating-point values.
pub fn ensure_positive_f64(
    value: f64,
    field: &str,
) -> CalcResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::invalid(field, "must be greater than zero"))
    }
}

/// Rejects non-finite floating-point values.
pub fn ensure_finite(
    value: f64,
    field: &str,
) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::invalid(field, "must be a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
    }

    // =========================================================================
    // round_f64 tests
    // =========================================================================

    #[test]
    fn round_f64_to_places() {
        assert_eq!(round_f64(22.857142, 1), 22.9);
        assert_eq!(round_f64(1742.75, 0), 1743.0);
    }

    #[test]
    fn round_f64_leaves_huge_values_alone() {
        assert_eq!(round_f64(1e307, 2), 1e307);
    }

    // =========================================================================
    // power tests
    // =========================================================================

    #[test]
    fn checked_powi_computes_integer_powers() {
        assert_eq!(checked_powi(dec!(1.5), 2, "rate").unwrap(), dec!(2.25));
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(checked_mul(Decimal::MAX, dec!(2), "value").unwrap_err(), too_large("value"));
        assert_eq!(checked_add(Decimal::MAX, dec!(1), "a").unwrap_err().field, "a");
        assert_eq!(checked_sub(Decimal::MIN, dec!(1), "b").unwrap_err().field, "b");
        assert_eq!(checked_div(Decimal::MAX, dec!(0.5), "part").unwrap_err().field, "part");
        assert_eq!(checked_mul(dec!(1.5), dec!(2), "value").unwrap(), dec!(3.0));
    }

    #[test]
    fn checked_powi_reports_overflow() {
        let err = checked_powi(dec!(1000), 100, "rate").unwrap_err();

        assert_eq!(err.field, "rate");
    }

    // =========================================================================
    // guard tests
    // =========================================================================

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(dec!(0), "price").is_err());
        assert_eq!(ensure_positive(dec!(1), "price").unwrap(), dec!(1));
    }

    #[test]
    fn ensure_non_negative_accepts_zero() {
        assert_eq!(ensure_non_negative(dec!(0), "tax").unwrap(), dec!(0));
        assert!(ensure_non_negative(dec!(-1), "tax").is_err());
    }

    #[test]
    fn ensure_positive_f64_rejects_nan() {
        assert!(ensure_positive_f64(f64::NAN, "w").is_err());
        assert!(ensure_positive_f64(-1.0, "w").is_err());
    }
}
