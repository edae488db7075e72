//! Required minimum distribution from a tax-deferred retirement account.
//!
//! `RMD = prior year-end balance / distribution period(age)` using the IRS
//! Uniform Lifetime Table. Distributions start at [`RMD_START_AGE`]; ages past
//! the end of the table use its last period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{ensure_non_negative, round_half_up};
use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::{decimal_to_f64, format_currency, format_percent};
use crate::presentation::{BarSeries, ChartSpec, Present, Report};

/// First age at which a distribution is required.
pub const RMD_START_AGE: u32 = 73;

const TABLE_FIRST_AGE: u32 = 72;
const TABLE_LAST_AGE: u32 = 120;
const MAX_PROJECTION_YEARS: u32 = 50;

/// Uniform Lifetime Table distribution periods in tenths of a year, ages
/// 72 through 120.
const UNIFORM_LIFETIME_TABLE: [i64; 49] = [
    274, 265, 255, 246, 237, 229, 220, 211, 202, 194, // 72-81
    185, 177, 168, 160, 152, 144, 137, 129, 122, 115, // 82-91
    108, 101, 95, 89, 84, 78, 73, 68, 64, 60, // 92-101
    56, 52, 49, 46, 43, 41, 39, 37, 35, 34, // 102-111
    33, 31, 30, 29, 28, 27, 25, 23, 20, // 112-120
];

/// Distribution period for `age`, or `None` below the table.
pub fn distribution_period(age: u32) -> Option<Decimal> {
    if age < TABLE_FIRST_AGE {
        return None;
    }
    let index = (age.min(TABLE_LAST_AGE) - TABLE_FIRST_AGE) as usize;
    Some(Decimal::new(UNIFORM_LIFETIME_TABLE[index], 1))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RmdInput {
    /// Age reached during the distribution year.
    pub age: u32,
    /// Account balance on December 31 of the prior year.
    pub prior_year_balance: Decimal,
    /// Assumed annual growth in percent, used only for the projection.
    pub growth_rate: Decimal,
    /// Years to project after the current one; zero for none.
    pub projection_years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RmdProjectionRow {
    pub age: u32,
    pub start_balance: Decimal,
    pub distribution: Decimal,
    pub end_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RmdResult {
    pub input: RmdInput,
    pub required: bool,
    pub distribution_period: Option<Decimal>,
    pub distribution: Decimal,
    /// Share of the balance withdrawn, in percent.
    pub withdrawal_rate: Decimal,
    /// Current year first.
    pub projection: Vec<RmdProjectionRow>,
}

fn required_distribution(
    age: u32,
    balance: Decimal,
) -> (bool, Option<Decimal>, Decimal) {
    let period = distribution_period(age);
    match period {
        Some(p) if age >= RMD_START_AGE => (true, period, round_half_up(balance / p)),
        _ => (false, period, Decimal::ZERO),
    }
}

impl RmdInput {
    pub fn calculate(&self) -> CalcResult<RmdResult> {
        let balance = ensure_non_negative(self.prior_year_balance, "prior_year_balance")?;
        if self.growth_rate <= -Decimal::ONE_HUNDRED {
            return Err(ValidationError::invalid(
                "growth_rate",
                "must be greater than -100",
            ));
        }
        if self.projection_years > MAX_PROJECTION_YEARS {
            return Err(ValidationError::invalid(
                "projection_years",
                format!("at most {MAX_PROJECTION_YEARS} years can be projected"),
            ));
        }

        let (required, period, distribution) = required_distribution(self.age, balance);
        debug!(age = self.age, required, distribution = %distribution, "rmd");

        let growth = Decimal::ONE + self.growth_rate / Decimal::ONE_HUNDRED;
        let mut projection = Vec::new();
        if self.projection_years > 0 {
            let mut start = balance;
            for age in self.age..=self.age + self.projection_years {
                let (_, _, drawn) = required_distribution(age, start);
                let end = round_half_up((start - drawn) * growth);
                projection.push(RmdProjectionRow {
                    age,
                    start_balance: start,
                    distribution: drawn,
                    end_balance: end,
                });
                start = end;
            }
        }

        let withdrawal_rate = if balance.is_zero() {
            Decimal::ZERO
        } else {
            round_half_up(distribution / balance * Decimal::ONE_HUNDRED)
        };

        Ok(RmdResult {
            input: self.clone(),
            required,
            distribution_period: period,
            distribution,
            withdrawal_rate,
            projection,
        })
    }
}

impl Present for RmdResult {
    fn report(&self) -> Report {
        let period = self
            .distribution_period
            .map_or_else(|| "n/a".to_string(), |p| p.to_string());
        let mut report = Report::new("Required Minimum Distribution")
            .line("Age", self.input.age.to_string())
            .line("Distribution period", period);
        report = if self.required {
            report
                .line("Required distribution", format_currency(self.distribution))
                .line("Withdrawal rate", format_percent(self.withdrawal_rate, 2))
        } else {
            report.line(
                "Required distribution",
                format!("not required until age {RMD_START_AGE}"),
            )
        };

        if self.projection.is_empty() {
            return report;
        }
        report.with_chart(ChartSpec::Bar {
            title: "Projected distributions".to_string(),
            categories: self.projection.iter().map(|r| r.age.to_string()).collect(),
            series: vec![
                BarSeries {
                    name: "distribution".to_string(),
                    values: self.projection.iter().map(|r| decimal_to_f64(r.distribution)).collect(),
                },
                BarSeries {
                    name: "end balance".to_string(),
                    values: self.projection.iter().map(|r| decimal_to_f64(r.end_balance)).collect(),
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input(age: u32) -> RmdInput {
        RmdInput {
            age,
            prior_year_balance: dec!(100000),
            growth_rate: dec!(0),
            projection_years: 0,
        }
    }

    // =========================================================================
    // distribution_period
    // =========================================================================

    #[test]
    fn table_endpoints() {
        assert_eq!(distribution_period(71), None);
        assert_eq!(distribution_period(72), Some(dec!(27.4)));
        assert_eq!(distribution_period(73), Some(dec!(26.5)));
        assert_eq!(distribution_period(100), Some(dec!(6.4)));
        assert_eq!(distribution_period(120), Some(dec!(2.0)));
        assert_eq!(distribution_period(125), Some(dec!(2.0)));
    }

    // =========================================================================
    // calculate
    // =========================================================================

    #[test]
    fn distribution_at_75() {
        let result = input(75).calculate().unwrap();

        assert!(result.required);
        assert_eq!(result.distribution_period, Some(dec!(24.6)));
        assert_eq!(result.distribution, dec!(4065.04));
        assert_eq!(result.withdrawal_rate, dec!(4.07));
    }

    #[test]
    fn below_start_age_is_not_required() {
        let result = input(72).calculate().unwrap();

        assert!(!result.required);
        assert_eq!(result.distribution, dec!(0));
        assert_eq!(
            result.report().value_of("Required distribution"),
            Some("not required until age 73")
        );
    }

    #[test]
    fn past_table_end_uses_last_period() {
        let result = input(123).calculate().unwrap();

        assert_eq!(result.distribution, dec!(50000.00));
    }

    #[test]
    fn negative_balance_is_rejected() {
        let err = RmdInput {
            prior_year_balance: dec!(-1),
            ..input(80)
        }
        .calculate()
        .unwrap_err();

        assert_eq!(err.field, "prior_year_balance");
    }

    #[test]
    fn projection_carries_balance_forward() {
        let result = RmdInput {
            growth_rate: dec!(5),
            projection_years: 2,
            ..input(72)
        }
        .calculate()
        .unwrap();

        let ages: Vec<_> = result.projection.iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![72, 73, 74]);
        assert_eq!(result.projection[0].distribution, dec!(0));
        assert_eq!(result.projection[0].end_balance, dec!(105000.00));
        assert_eq!(result.projection[1].start_balance, dec!(105000.00));
        assert_eq!(result.projection[1].distribution, dec!(3962.26));
        assert!(matches!(result.report().chart, Some(ChartSpec::Bar { .. })));
    }
}
