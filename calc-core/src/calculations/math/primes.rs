//! Trial-division prime factorization.
//!
//! O(√n) per call. Intended for form-sized integers only, not as a general
//! purpose factorizer.

use crate::error::{CalcResult, ValidationError};

/// Largest input accepted by [`factorize`]; trial division stays under a
/// million steps.
pub const MAX_INPUT: u64 = 1_000_000_000_000;

/// Returns the prime factors of `n` in ascending order, with multiplicity.
///
/// `1` has no prime factors; `0` and values above [`MAX_INPUT`] are rejected.
///
/// ```
/// use calc_core::calculations::math::factorize;
///
/// assert_eq!(factorize(60).unwrap(), vec![2, 2, 3, 5]);
/// ```
pub fn factorize(n: u64) -> CalcResult<Vec<u64>> {
    if n == 0 {
        return Err(ValidationError::invalid("number", "zero has no prime factorization"));
    }
    if n > MAX_INPUT {
        return Err(ValidationError::invalid(
            "number",
            "must be at most 1,000,000,000,000",
        ));
    }

    let mut factors = Vec::new();
    let mut remaining = n;

    while remaining % 2 == 0 {
        factors.push(2);
        remaining /= 2;
    }

    let mut divisor = 3;
    while divisor <= remaining / divisor {
        while remaining % divisor == 0 {
            factors.push(divisor);
            remaining /= divisor;
        }
        divisor += 2;
    }

    if remaining > 2 {
        factors.push(remaining);
    }

    Ok(factors)
}

/// Primality by the same trial division used in [`factorize`].
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Renders factors in exponent form, e.g. `[2, 2, 3, 5]` as `2^2 × 3 × 5`.
pub fn format_factors(factors: &[u64]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = factors.iter().peekable();
    while let Some(&prime) = iter.next() {
        let mut power = 1;
        while iter.peek() == Some(&&prime) {
            iter.next();
            power += 1;
        }
        if power == 1 {
            parts.push(prime.to_string());
        } else {
            parts.push(format!("{prime}^{power}"));
        }
    }
    if parts.is_empty() {
        "1".to_string()
    } else {
        parts.join(" × ")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn factorize_sixty() {
        assert_eq!(factorize(60).unwrap(), vec![2, 2, 3, 5]);
    }

    #[test]
    fn factorize_prime_returns_itself() {
        assert_eq!(factorize(97).unwrap(), vec![97]);
    }

    #[test]
    fn factorize_one_is_empty() {
        assert_eq!(factorize(1).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn factorize_two_keeps_two() {
        assert_eq!(factorize(2).unwrap(), vec![2]);
    }

    #[test]
    fn factorize_square_of_prime() {
        assert_eq!(factorize(49).unwrap(), vec![7, 7]);
    }

    #[test]
    fn factorize_rejects_zero() {
        assert!(factorize(0).is_err());
    }

    #[test]
    fn factorize_rejects_values_above_limit() {
        let err = factorize(u64::MAX).unwrap_err();

        assert_eq!(err.field, "number");
        assert_eq!(err.message, "must be at most 1,000,000,000,000");
        assert_eq!(factorize(MAX_INPUT).unwrap(), [vec![2; 12], vec![5; 12]].concat());
    }

    #[test]
    fn factorize_large_prime_within_limit() {
        assert_eq!(factorize(999_999_999_989).unwrap(), vec![999_999_999_989]);
    }

    #[test]
    fn is_prime_small_values() {
        let primes: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();

        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn format_factors_uses_exponents() {
        assert_eq!(format_factors(&[2, 2, 3, 5]), "2^2 × 3 × 5");
        assert_eq!(format_factors(&[]), "1");
    }
}
