//! Random number draws: uniform, normal and unique integer sequences.

use std::collections::HashMap;
use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{ensure_finite, ensure_positive_f64, round_f64};
use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::format_number;
use crate::presentation::{BoxPlotStats, ChartSpec, Present, Report};

pub const MAX_COUNT: usize = 10_000;
const MAX_DECIMALS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Distribution {
    /// Uniform integers in `[min, max]`.
    Integer,
    /// Uniform reals in `[min, max]`, rounded to `decimals`.
    Decimal,
    /// Box-Muller normal draw, clamped to `[min, max]` and rounded to
    /// `decimals`.
    Normal { mean: f64, std_dev: f64 },
    /// Distinct integers from `[min, max]`.
    Unique,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomInput {
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub decimals: u32,
    pub distribution: Distribution,
}

impl Default for RandomInput {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 100.0,
            count: 1,
            decimals: 2,
            distribution: Distribution::Integer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomResult {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl RandomInput {
    /// Draws from the thread-local generator.
    pub fn generate(&self) -> CalcResult<RandomResult> {
        self.generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> CalcResult<RandomResult> {
        let min = ensure_finite(self.min, "min")?;
        let max = ensure_finite(self.max, "max")?;
        if min > max {
            return Err(ValidationError::invalid("max", "must not be less than min"));
        }
        if !(max - min).is_finite() {
            return Err(ValidationError::invalid("max", "range is too large"));
        }
        if self.count == 0 {
            return Err(ValidationError::invalid("count", "must be at least 1"));
        }
        if self.count > MAX_COUNT {
            return Err(ValidationError::invalid(
                "count",
                format!("at most {MAX_COUNT} numbers per draw"),
            ));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ValidationError::invalid(
                "decimals",
                format!("at most {MAX_DECIMALS} decimal places"),
            ));
        }

        let values = match self.distribution {
            Distribution::Integer => {
                let (lo, hi) = integer_bounds(min, max)?;
                (0..self.count).map(|_| rng.gen_range(lo..=hi) as f64).collect()
            }
            Distribution::Decimal => (0..self.count)
                .map(|_| round_f64(rng.gen_range(min..=max), self.decimals))
                .collect(),
            Distribution::Normal { mean, std_dev } => {
                let mean = ensure_finite(mean, "mean")?;
                let std_dev = ensure_positive_f64(std_dev, "std_dev")?;
                (0..self.count)
                    .map(|_| {
                        let z = box_muller(rng);
                        round_f64((mean + z * std_dev).clamp(min, max), self.decimals)
                    })
                    .collect()
            }
            Distribution::Unique => {
                let (lo, hi) = integer_bounds(min, max)?;
                unique_sample(lo, hi, self.count, rng)?
                    .into_iter()
                    .map(|v| v as f64)
                    .collect()
            }
        };

        Ok(summarize(values))
    }
}

/// `min`/`max` rounded inward to whole numbers.
fn integer_bounds(
    min: f64,
    max: f64,
) -> CalcResult<(i64, i64)> {
    let lo = min.ceil();
    let hi = max.floor();
    if lo > hi {
        return Err(ValidationError::invalid("max", "range contains no whole numbers"));
    }
    if lo < i64::MIN as f64 || hi > i64::MAX as f64 {
        return Err(ValidationError::invalid("max", "range is too large"));
    }
    Ok((lo as i64, hi as i64))
}

/// One standard-normal sample.
fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // 1 - [0, 1) keeps ln away from zero
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Partial Fisher-Yates shuffle over the virtual pool `lo..=hi`. Only
/// displaced slots are materialized, so wide ranges cost `O(count)`.
fn unique_sample<R: Rng + ?Sized>(
    lo: i64,
    hi: i64,
    count: usize,
    rng: &mut R,
) -> CalcResult<Vec<i64>> {
    let pool = (hi as i128 - lo as i128 + 1) as u128;
    if (count as u128) > pool {
        return Err(ValidationError::invalid(
            "count",
            format!("only {pool} distinct values exist between {lo} and {hi}"),
        ));
    }
    let pool = u64::try_from(pool).unwrap_or(u64::MAX);

    let mut displaced: HashMap<u64, u64> = HashMap::new();
    let mut out = Vec::with_capacity(count);
    for i in 0..count as u64 {
        let j = rng.gen_range(i..pool);
        let at_j = *displaced.get(&j).unwrap_or(&j);
        let at_i = *displaced.get(&i).unwrap_or(&i);
        displaced.insert(j, at_i);
        out.push(lo.wrapping_add(at_j as i64));
    }
    Ok(out)
}

fn summarize(values: Vec<f64>) -> RandomResult {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let n = values.len() as f64;
    let sum = values.iter().sum::<f64>();
    let mean = if sum.is_finite() {
        sum / n
    } else {
        // draws near f64::MAX
        values.iter().map(|v| v / n).sum()
    };
    RandomResult { values, min, max, mean }
}

impl RandomResult {
    /// Values joined with `", "`.
    pub fn joined(&self) -> String {
        self.values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Present for RandomResult {
    fn report(&self) -> Report {
        let report = Report::new("Random Numbers")
            .line("Values", self.joined())
            .line("Count", self.values.len().to_string())
            .line("Min", format_number(self.min, 4))
            .line("Max", format_number(self.max, 4))
            .line("Mean", format_number(self.mean, 4));
        match BoxPlotStats::from_values(&self.values) {
            Some(stats) if self.values.len() > 1 => report.with_chart(ChartSpec::BoxPlot {
                title: "Distribution".to_string(),
                stats,
            }),
            _ => report,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn input(distribution: Distribution) -> RandomInput {
        RandomInput {
            min: 1.0,
            max: 10.0,
            count: 10,
            decimals: 2,
            distribution,
        }
    }

    // =========================================================================
    // unique
    // =========================================================================

    #[test]
    fn unique_full_range_is_a_permutation() {
        let result = input(Distribution::Unique).generate_with(&mut rng()).unwrap();

        let mut sorted = result.values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(sorted, (1..=10).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn unique_more_than_range_is_rejected() {
        let err = RandomInput {
            count: 11,
            ..input(Distribution::Unique)
        }
        .generate_with(&mut rng())
        .unwrap_err();

        assert_eq!(err.field, "count");
    }

    #[test]
    fn unique_over_huge_range() {
        let result = RandomInput {
            min: 0.0,
            max: 1e15,
            count: 1000,
            ..input(Distribution::Unique)
        }
        .generate_with(&mut rng())
        .unwrap();

        let mut sorted = result.values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted.dedup();
        assert_eq!(sorted.len(), 1000);
    }

    // =========================================================================
    // uniform / normal
    // =========================================================================

    #[test]
    fn integers_stay_in_range() {
        let result = RandomInput {
            count: 500,
            ..input(Distribution::Integer)
        }
        .generate_with(&mut rng())
        .unwrap();

        assert!(result.values.iter().all(|v| (1.0..=10.0).contains(v) && v.fract() == 0.0));
    }

    #[test]
    fn range_wider_than_f64_is_rejected() {
        let err = RandomInput {
            min: -1e308,
            max: 1e308,
            ..input(Distribution::Decimal)
        }
        .generate_with(&mut rng())
        .unwrap_err();

        assert_eq!(err.field, "max");
        assert_eq!(err.message, "range is too large");
    }

    #[test]
    fn huge_decimal_draws_stay_finite() {
        let result = RandomInput {
            min: 0.0,
            max: 1e307,
            count: 50,
            ..input(Distribution::Decimal)
        }
        .generate_with(&mut rng())
        .unwrap();

        assert!(result.values.iter().all(|v| v.is_finite() && (0.0..=1e307).contains(v)));
        assert!(result.mean.is_finite());
    }

    #[test]
    fn decimals_are_rounded() {
        let result = input(Distribution::Decimal).generate_with(&mut rng()).unwrap();

        assert!(result.values.iter().all(|v| round_f64(*v, 2) == *v));
    }

    #[test]
    fn normal_is_clamped() {
        let result = RandomInput {
            count: 1000,
            ..input(Distribution::Normal {
                mean: 5.0,
                std_dev: 10.0,
            })
        }
        .generate_with(&mut rng())
        .unwrap();

        assert!(result.min >= 1.0);
        assert!(result.max <= 10.0);
    }

    #[test]
    fn same_seed_same_draw() {
        let a = input(Distribution::Integer).generate_with(&mut rng()).unwrap();
        let b = input(Distribution::Integer).generate_with(&mut rng()).unwrap();

        assert_eq!(a, b);
    }

    // =========================================================================
    // validation / summary
    // =========================================================================

    #[test]
    fn inverted_range_and_zero_count_are_rejected() {
        let inverted = RandomInput {
            min: 10.0,
            max: 1.0,
            ..input(Distribution::Integer)
        };
        let empty = RandomInput {
            count: 0,
            ..input(Distribution::Integer)
        };

        assert_eq!(inverted.generate_with(&mut rng()).unwrap_err().field, "max");
        assert_eq!(empty.generate_with(&mut rng()).unwrap_err().field, "count");
    }

    #[test]
    fn summary_statistics() {
        let result = summarize(vec![2.0, 4.0, 9.0]);

        assert_eq!((result.min, result.max, result.mean), (2.0, 9.0, 5.0));
        assert_eq!(result.joined(), "2, 4, 9");
    }

    proptest! {
        #[test]
        fn unique_draws_never_repeat(lo in -1000i64..1000, span in 0i64..200, seed in any::<u64>()) {
            let pool = (span + 1) as usize;
            let count = pool.min(50);
            let result = RandomInput {
                min: lo as f64,
                max: (lo + span) as f64,
                count,
                decimals: 0,
                distribution: Distribution::Unique,
            }
            .generate_with(&mut StdRng::seed_from_u64(seed))
            .unwrap();

            let mut sorted = result.values.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));
            sorted.dedup();
            prop_assert_eq!(sorted.len(), count);
            prop_assert!(result.values.iter().all(|v| *v >= lo as f64 && *v <= (lo + span) as f64));
        }
    }
}
