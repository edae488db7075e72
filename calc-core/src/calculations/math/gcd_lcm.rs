//! Greatest common divisor and least common multiple.
//!
//! Zero inputs are rejected: the calculator treats GCD/LCM involving zero as
//! undefined rather than applying the `gcd(a, 0) = |a|` convention.
//!
//! # Example
//!
//! ```
//! use calc_core::calculations::math::{GcdLcmCalculator, gcd, lcm};
//!
//! assert_eq!(gcd(12, 18).unwrap(), 6);
//! assert_eq!(lcm(12, 18).unwrap(), 36);
//!
//! let result = GcdLcmCalculator::calculate(&[12, 18, 30]).unwrap();
//! assert_eq!(result.gcd, 6);
//! assert_eq!(result.lcm, 180);
//! ```

use serde::{Deserialize, Serialize};

use super::primes::{MAX_INPUT, factorize, format_factors};
use crate::error::{CalcResult, ValidationError};
use crate::presentation::{BarSeries, ChartSpec, Present, Report};

fn euclid(
    a: u64,
    b: u64,
) -> u64 {
    if b == 0 { a } else { euclid(b, a % b) }
}

fn reject_zero(
    value: i64,
    field: &str,
) -> CalcResult<u64> {
    if value == 0 {
        Err(ValidationError::invalid(field, "zero inputs are rejected"))
    } else {
        Ok(value.unsigned_abs())
    }
}

/// Greatest common divisor of two non-zero integers (always positive).
pub fn gcd(
    a: i64,
    b: i64,
) -> CalcResult<u64> {
    let a = reject_zero(a, "a")?;
    let b = reject_zero(b, "b")?;
    Ok(euclid(a, b))
}

/// Least common multiple `|a·b| / gcd(a, b)` of two non-zero integers.
pub fn lcm(
    a: i64,
    b: i64,
) -> CalcResult<u64> {
    let divisor = gcd(a, b)?;
    let product = (a.unsigned_abs() as u128) * (b.unsigned_abs() as u128);
    u64::try_from(product / divisor as u128)
        .map_err(|_| ValidationError::invalid("numbers", "least common multiple is too large"))
}

/// Result of the multi-number GCD/LCM page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcdLcmResult {
    pub numbers: Vec<i64>,
    pub gcd: u64,
    pub lcm: u64,
    /// Prime factorization of each input's absolute value, in input order.
    pub factorizations: Vec<Vec<u64>>,
}

/// GCD/LCM over a list of integers.
pub struct GcdLcmCalculator;

impl GcdLcmCalculator {
    /// Folds GCD and LCM across `numbers` (at least two, none zero).
    pub fn calculate(numbers: &[i64]) -> CalcResult<GcdLcmResult> {
        if numbers.len() < 2 {
            return Err(ValidationError::invalid(
                "numbers",
                "enter at least two numbers",
            ));
        }

        if numbers.iter().any(|n| n.unsigned_abs() > MAX_INPUT) {
            return Err(ValidationError::invalid(
                "numbers",
                "each number must be at most 1,000,000,000,000 in size",
            ));
        }

        let mut running_gcd = reject_zero(numbers[0], "numbers")?;
        let mut running_lcm = running_gcd;
        for &n in &numbers[1..] {
            let value = reject_zero(n, "numbers")?;
            running_gcd = euclid(running_gcd, value);
            let step = euclid(running_lcm, value);
            let product = (running_lcm as u128) * (value as u128) / step as u128;
            running_lcm = u64::try_from(product).map_err(|_| {
                ValidationError::invalid("numbers", "least common multiple is too large")
            })?;
        }

        let factorizations = numbers
            .iter()
            .map(|n| factorize(n.unsigned_abs()))
            .collect::<CalcResult<Vec<_>>>()?;

        Ok(GcdLcmResult {
            numbers: numbers.to_vec(),
            gcd: running_gcd,
            lcm: running_lcm,
            factorizations,
        })
    }
}

impl Present for GcdLcmResult {
    fn report(&self) -> Report {
        let mut report = Report::new("GCD & LCM")
            .line("GCD", self.gcd.to_string())
            .line("LCM", self.lcm.to_string());
        for (n, factors) in self.numbers.iter().zip(&self.factorizations) {
            report = report.line(format!("Factors of {n}"), format_factors(factors));
        }
        report.with_chart(ChartSpec::Bar {
            title: "Inputs vs GCD".to_string(),
            categories: self.numbers.iter().map(|n| n.to_string()).collect(),
            series: vec![
                BarSeries {
                    name: "Value".to_string(),
                    values: self.numbers.iter().map(|n| n.unsigned_abs() as f64).collect(),
                },
                BarSeries {
                    name: "GCD".to_string(),
                    values: vec![self.gcd as f64; self.numbers.len()],
                },
            ],
        })
    }
}
