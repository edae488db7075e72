//! Simple and compound interest.
//!
//! | Kind       | Final amount |
//! |------------|--------------|
//! | Simple     | `P · (1 + r·t)` |
//! | Compound   | `P · (1 + r/n)^(n·t)` |
//! | Continuous | `P · e^(r·t)` |
//!
//! Rates are entered as annual percentages (`5` means 5%).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use calc_core::calculations::finance::{CompoundFrequency, InterestInput, InterestKind};
//!
//! let result = InterestInput {
//!     principal: dec!(1000),
//!     annual_rate: dec!(5),
//!     years: dec!(10),
//!     kind: InterestKind::Compound(CompoundFrequency::Annually),
//! }
//! .calculate()
//! .unwrap();
//!
//! assert_eq!(result.final_amount, dec!(1628.89));
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{
    checked_add, checked_mul, checked_powd, checked_powi, ensure_non_negative, ensure_positive,
    round_half_up, too_large,
};
use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::{decimal_to_f64, format_currency, format_percent};
use crate::presentation::{ChartSpec, LineSeries, Present, Report};

/// Longest horizon accepted; the schedule has one row per year.
pub const MAX_YEARS: u32 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompoundFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    #[default]
    Monthly,
    Daily,
    Continuous,
}

impl CompoundFrequency {
    pub const ALL: [Self; 6] = [
        Self::Annually,
        Self::SemiAnnually,
        Self::Quarterly,
        Self::Monthly,
        Self::Daily,
        Self::Continuous,
    ];

    /// Compounding periods per year; `None` for continuous compounding.
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Self::Annually => Some(1),
            Self::SemiAnnually => Some(2),
            Self::Quarterly => Some(4),
            Self::Monthly => Some(12),
            Self::Daily => Some(365),
            Self::Continuous => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Annually => "annually",
            Self::SemiAnnually => "semi-annually",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
            Self::Daily => "daily",
            Self::Continuous => "continuously",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(s.trim()))
            .or_else(|| match s.trim().to_ascii_lowercase().as_str() {
                "annual" | "yearly" => Some(Self::Annually),
                "semiannual" | "semi-annual" => Some(Self::SemiAnnually),
                "continuous" => Some(Self::Continuous),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestKind {
    Simple,
    Compound(CompoundFrequency),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestInput {
    pub principal: Decimal,
    /// Annual rate in percent.
    pub annual_rate: Decimal,
    /// May be fractional.
    pub years: Decimal,
    pub kind: InterestKind,
}

/// Balance at the end of a (possibly partial) year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBalance {
    pub year: Decimal,
    pub balance: Decimal,
    pub interest_to_date: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestResult {
    pub input: InterestInput,
    pub total_interest: Decimal,
    pub final_amount: Decimal,
    /// Yearly schedule, the last row landing exactly on `years`.
    pub schedule: Vec<YearBalance>,
}

impl InterestInput {
    /// Unrounded balance after `t` years.
    fn amount_after(
        &self,
        rate: Decimal,
        t: Decimal,
    ) -> CalcResult<Decimal> {
        let growth = match self.kind {
            InterestKind::Simple => {
                checked_add(Decimal::ONE, checked_mul(rate, t, "annual_rate")?, "annual_rate")?
            }
            InterestKind::Compound(frequency) => match frequency.periods_per_year() {
                Some(n) => {
                    let n = Decimal::from(n);
                    let base = Decimal::ONE + rate / n;
                    let periods = n * t;
                    if periods.fract().is_zero() {
                        let whole = periods
                            .to_i64()
                            .ok_or_else(|| too_large("years"))?;
                        checked_powi(base, whole, "years")?
                    } else {
                        checked_powd(base, periods, "years")?
                    }
                }
                None => checked_mul(rate, t, "annual_rate")?
                    .checked_exp()
                    .ok_or_else(|| too_large("years"))?,
            },
        };
        checked_mul(self.principal, growth, "principal")
    }

    pub fn calculate(&self) -> CalcResult<InterestResult> {
        ensure_non_negative(self.principal, "principal")?;
        ensure_non_negative(self.annual_rate, "annual_rate")?;
        let years = ensure_positive(self.years, "years")?;
        if years > Decimal::from(MAX_YEARS) {
            return Err(ValidationError::invalid(
                "years",
                format!("must be at most {MAX_YEARS}"),
            ));
        }
        let rate = self.annual_rate / Decimal::ONE_HUNDRED;
        debug!(principal = %self.principal, rate = %rate, years = %years, "interest");

        let mut schedule = Vec::new();
        let mut year = Decimal::ONE;
        while year < years {
            schedule.push(self.balance_row(rate, year)?);
            year += Decimal::ONE;
        }
        schedule.push(self.balance_row(rate, years)?);

        let final_amount = round_half_up(self.amount_after(rate, years)?);
        Ok(InterestResult {
            input: self.clone(),
            total_interest: final_amount - round_half_up(self.principal),
            final_amount,
            schedule,
        })
    }

    fn balance_row(
        &self,
        rate: Decimal,
        year: Decimal,
    ) -> CalcResult<YearBalance> {
        let balance = round_half_up(self.amount_after(rate, year)?);
        Ok(YearBalance {
            year,
            balance,
            interest_to_date: balance - round_half_up(self.principal),
        })
    }
}

impl Present for InterestResult {
    fn report(&self) -> Report {
        let method = match self.input.kind {
            InterestKind::Simple => "Simple interest".to_string(),
            InterestKind::Compound(f) => format!("Compounded {}", f.label()),
        };
        let points = std::iter::once([0.0, decimal_to_f64(self.input.principal)])
            .chain(
                self.schedule
                    .iter()
                    .map(|row| [decimal_to_f64(row.year), decimal_to_f64(row.balance)]),
            )
            .collect();

        Report::new("Interest")
            .line("Method", method)
            .line("Principal", format_currency(self.input.principal))
            .line("Annual rate", format_percent(self.input.annual_rate, 2))
            .line("Total interest", format_currency(self.total_interest))
            .line("Final amount", format_currency(self.final_amount))
            .with_chart(ChartSpec::Line {
                title: "Balance over time".to_string(),
                x_label: "year".to_string(),
                y_label: "balance".to_string(),
                series: vec![LineSeries {
                    name: "balance".to_string(),
                    points,
                }],
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input(kind: InterestKind) -> InterestInput {
        InterestInput {
            principal: dec!(1000),
            annual_rate: dec!(5),
            years: dec!(10),
            kind,
        }
    }

    // =========================================================================
    // simple
    // =========================================================================

    #[test]
    fn simple_interest() {
        let result = input(InterestKind::Simple).calculate().unwrap();

        assert_eq!(result.total_interest, dec!(500.00));
        assert_eq!(result.final_amount, dec!(1500.00));
        assert_eq!(result.schedule.len(), 10);
        assert_eq!(result.schedule[0].balance, dec!(1050.00));
    }

    // =========================================================================
    // compound
    // =========================================================================

    #[test]
    fn compound_annually() {
        let result = input(InterestKind::Compound(CompoundFrequency::Annually))
            .calculate()
            .unwrap();

        assert_eq!(result.final_amount, dec!(1628.89));
        assert_eq!(result.total_interest, dec!(628.89));
    }

    #[test]
    fn compound_monthly() {
        let result = input(InterestKind::Compound(CompoundFrequency::Monthly))
            .calculate()
            .unwrap();

        assert_eq!(result.final_amount, dec!(1647.01));
    }

    #[test]
    fn compound_continuously() {
        let result = input(InterestKind::Compound(CompoundFrequency::Continuous))
            .calculate()
            .unwrap();

        assert_eq!(result.final_amount, dec!(1648.72));
    }

    #[test]
    fn fractional_years_end_schedule_on_term() {
        let result = InterestInput {
            years: dec!(2.5),
            ..input(InterestKind::Simple)
        }
        .calculate()
        .unwrap();

        let years: Vec<_> = result.schedule.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![dec!(1), dec!(2), dec!(2.5)]);
        assert_eq!(result.final_amount, dec!(1125.00));
    }

    #[test]
    fn zero_rate_earns_nothing() {
        let result = InterestInput {
            annual_rate: dec!(0),
            ..input(InterestKind::Compound(CompoundFrequency::Daily))
        }
        .calculate()
        .unwrap();

        assert_eq!(result.total_interest, dec!(0));
    }

    // =========================================================================
    // validation
    // =========================================================================

    #[test]
    fn rejects_non_positive_years_and_negative_inputs() {
        let zero_years = InterestInput {
            years: dec!(0),
            ..input(InterestKind::Simple)
        };
        let negative_rate = InterestInput {
            annual_rate: dec!(-1),
            ..input(InterestKind::Simple)
        };

        assert_eq!(zero_years.calculate().unwrap_err().field, "years");
        assert_eq!(negative_rate.calculate().unwrap_err().field, "annual_rate");
    }

    #[test]
    fn years_beyond_horizon_are_rejected() {
        let err = InterestInput {
            annual_rate: dec!(0),
            years: dec!(2000000),
            ..input(InterestKind::Simple)
        }
        .calculate()
        .unwrap_err();

        assert_eq!(err.field, "years");
        assert_eq!(err.message, "must be at most 1000");
    }

    #[test]
    fn thousand_year_horizon_has_one_row_per_year() {
        let result = InterestInput {
            annual_rate: dec!(0),
            years: dec!(1000),
            ..input(InterestKind::Simple)
        }
        .calculate()
        .unwrap();

        assert_eq!(result.schedule.len(), 1000);
        assert_eq!(result.total_interest, dec!(0));
    }

    #[test]
    fn enormous_simple_rate_reports_overflow() {
        let err = InterestInput {
            principal: dec!(1),
            annual_rate: Decimal::MAX,
            years: dec!(1000),
            ..input(InterestKind::Simple)
        }
        .calculate()
        .unwrap_err();

        assert_eq!(err.field, "annual_rate");
    }

    #[test]
    fn frequency_parse() {
        assert_eq!(CompoundFrequency::parse("Quarterly"), Some(CompoundFrequency::Quarterly));
        assert_eq!(CompoundFrequency::parse("continuous"), Some(CompoundFrequency::Continuous));
        assert_eq!(CompoundFrequency::parse("hourly"), None);
    }
}
