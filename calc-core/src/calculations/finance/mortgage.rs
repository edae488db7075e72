//! Fixed-rate mortgage payment and amortization schedule.
//!
//! The monthly principal-and-interest payment uses the standard annuity
//! formula with monthly rate `r` and term in months `n`:
//!
//! ```text
//! M = P · r(1 + r)^n / ((1 + r)^n − 1)        (r > 0)
//! M = P / n                                   (r = 0)
//! ```
//!
//! Property tax, insurance and HOA dues are flat monthly add-ons that do not
//! touch the loan balance.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use calc_core::calculations::finance::MortgageInput;
//!
//! let result = MortgageInput {
//!     home_price: dec!(250000),
//!     down_payment: dec!(50000),
//!     annual_rate: dec!(6),
//!     term_years: 30,
//!     ..Default::default()
//! }
//! .calculate()
//! .unwrap();
//!
//! assert_eq!(result.monthly_payment, dec!(1199.10));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{
    checked_add, checked_div, checked_mul, checked_powi, ensure_non_negative, ensure_positive,
    round_half_up, too_large,
};
use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::{decimal_to_f64, format_currency, format_percent};
use crate::presentation::{ChartSpec, Present, Report, Slice};

const MONTHS_PER_YEAR: u32 = 12;
/// Longest term offered; also bounds the schedule length.
pub const MAX_TERM_YEARS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageInput {
    pub home_price: Decimal,
    pub down_payment: Decimal,
    /// Annual rate in percent.
    pub annual_rate: Decimal,
    pub term_years: u32,
    pub monthly_property_tax: Decimal,
    pub monthly_insurance: Decimal,
    pub monthly_hoa: Decimal,
}

impl Default for MortgageInput {
    fn default() -> Self {
        Self {
            home_price: Decimal::from(300_000),
            down_payment: Decimal::from(60_000),
            annual_rate: Decimal::new(65, 1),
            term_years: 30,
            monthly_property_tax: Decimal::ZERO,
            monthly_insurance: Decimal::ZERO,
            monthly_hoa: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Decimal,
    pub principal: Decimal,
    pub interest: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageResult {
    pub input: MortgageInput,
    pub loan_amount: Decimal,
    /// Principal and interest only.
    pub monthly_payment: Decimal,
    /// Payment plus tax, insurance and HOA.
    pub total_monthly_cost: Decimal,
    pub total_interest: Decimal,
    /// Sum of every principal-and-interest payment.
    pub total_paid: Decimal,
    pub schedule: Vec<AmortizationRow>,
}

impl MortgageInput {
    pub fn calculate(&self) -> CalcResult<MortgageResult> {
        ensure_positive(self.home_price, "home_price")?;
        ensure_non_negative(self.down_payment, "down_payment")?;
        ensure_non_negative(self.annual_rate, "annual_rate")?;
        ensure_non_negative(self.monthly_property_tax, "monthly_property_tax")?;
        ensure_non_negative(self.monthly_insurance, "monthly_insurance")?;
        ensure_non_negative(self.monthly_hoa, "monthly_hoa")?;
        if self.term_years == 0 {
            return Err(ValidationError::invalid("term_years", "must be greater than zero"));
        }
        if self.term_years > MAX_TERM_YEARS {
            return Err(ValidationError::invalid(
                "term_years",
                format!("must be at most {MAX_TERM_YEARS}"),
            ));
        }
        let loan_amount = self.home_price - self.down_payment;
        if loan_amount <= Decimal::ZERO {
            return Err(ValidationError::invalid(
                "down_payment",
                "must be less than the home price",
            ));
        }

        let months = self
            .term_years
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or_else(|| too_large("term_years"))?;
        let monthly_rate = self.annual_rate / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR);
        let monthly_payment = round_half_up(monthly_payment(loan_amount, monthly_rate, months)?);
        debug!(loan = %loan_amount, payment = %monthly_payment, months, "mortgage");

        let schedule = amortize(loan_amount, monthly_rate, monthly_payment, months);
        let total_interest = checked_total(schedule.iter().map(|row| row.interest))?;
        let total_paid = checked_total(schedule.iter().map(|row| row.payment))?;
        let total_monthly_cost = [
            (self.monthly_property_tax, "monthly_property_tax"),
            (self.monthly_insurance, "monthly_insurance"),
            (self.monthly_hoa, "monthly_hoa"),
        ]
        .into_iter()
        .try_fold(monthly_payment, |sum, (amount, field)| checked_add(sum, amount, field))?;

        Ok(MortgageResult {
            input: self.clone(),
            loan_amount,
            monthly_payment,
            total_monthly_cost,
            total_interest,
            total_paid,
            schedule,
        })
    }
}

/// Unrounded principal-and-interest payment.
fn monthly_payment(
    principal: Decimal,
    monthly_rate: Decimal,
    months: u32,
) -> CalcResult<Decimal> {
    let n = Decimal::from(months);
    if monthly_rate.is_zero() {
        return Ok(principal / n);
    }
    let growth = checked_powi(Decimal::ONE + monthly_rate, i64::from(months), "term_years")?;
    let numerator = checked_mul(
        checked_mul(principal, monthly_rate, "home_price")?,
        growth,
        "home_price",
    )?;
    checked_div(numerator, growth - Decimal::ONE, "home_price")
}

/// Schedule totals; very large loans can overflow once summed over the term.
fn checked_total(mut amounts: impl Iterator<Item = Decimal>) -> CalcResult<Decimal> {
    amounts.try_fold(Decimal::ZERO, |sum, amount| checked_add(sum, amount, "home_price"))
}

/// Month-by-month schedule. Interest is rounded to cents each month and the
/// final payment absorbs the rounding residue so the balance lands on zero.
fn amortize(
    principal: Decimal,
    monthly_rate: Decimal,
    payment: Decimal,
    months: u32,
) -> Vec<AmortizationRow> {
    let mut balance = principal;
    let mut rows = Vec::with_capacity(months as usize);
    for month in 1..=months {
        let interest = round_half_up(balance * monthly_rate);
        let principal_paid = if month == months || payment - interest > balance {
            balance
        } else {
            payment - interest
        };
        balance -= principal_paid;
        rows.push(AmortizationRow {
            month,
            payment: principal_paid + interest,
            principal: principal_paid,
            interest,
            balance,
        });
        if balance.is_zero() {
            break;
        }
    }
    rows
}

impl MortgageResult {
    /// Remaining balance at the end of each loan year.
    pub fn yearly_balances(&self) -> Vec<(u32, Decimal)> {
        self.schedule
            .iter()
            .filter(|row| row.month % MONTHS_PER_YEAR == 0 || row.balance.is_zero())
            .map(|row| (row.month.div_ceil(MONTHS_PER_YEAR), row.balance))
            .collect()
    }
}

impl Present for MortgageResult {
    fn report(&self) -> Report {
        let mut slices = vec![Slice::new(
            "Principal & interest",
            decimal_to_f64(self.monthly_payment),
        )];
        for (label, amount) in [
            ("Property tax", self.input.monthly_property_tax),
            ("Insurance", self.input.monthly_insurance),
            ("HOA", self.input.monthly_hoa),
        ] {
            if !amount.is_zero() {
                slices.push(Slice::new(label, decimal_to_f64(amount)));
            }
        }

        Report::new("Mortgage")
            .line("Loan amount", format_currency(self.loan_amount))
            .line("Interest rate", format_percent(self.input.annual_rate, 3))
            .line("Term", format!("{} years", self.input.term_years))
            .line("Monthly payment", format_currency(self.monthly_payment))
            .line("Total monthly cost", format_currency(self.total_monthly_cost))
            .line("Total interest", format_currency(self.total_interest))
            .line("Total paid", format_currency(self.total_paid))
            .with_chart(ChartSpec::Pie {
                title: "Monthly cost breakdown".to_string(),
                slices,
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input() -> MortgageInput {
        MortgageInput {
            home_price: dec!(250000),
            down_payment: dec!(50000),
            annual_rate: dec!(6),
            term_years: 30,
            ..Default::default()
        }
    }

    // =========================================================================
    // payment
    // =========================================================================

    #[test]
    fn thirty_year_payment() {
        let result = input().calculate().unwrap();

        assert_eq!(result.loan_amount, dec!(200000));
        assert_eq!(result.monthly_payment, dec!(1199.10));
    }

    #[test]
    fn zero_rate_divides_evenly() {
        let result = MortgageInput {
            home_price: dec!(120000),
            down_payment: dec!(0),
            annual_rate: dec!(0),
            term_years: 10,
            ..Default::default()
        }
        .calculate()
        .unwrap();

        assert_eq!(result.monthly_payment, dec!(1000.00));
        assert_eq!(result.total_interest, dec!(0));
        assert_eq!(result.total_paid, dec!(120000));
    }

    #[test]
    fn add_ons_raise_monthly_cost_only() {
        let result = MortgageInput {
            monthly_property_tax: dec!(250),
            monthly_insurance: dec!(100),
            monthly_hoa: dec!(50),
            ..input()
        }
        .calculate()
        .unwrap();

        assert_eq!(result.monthly_payment, dec!(1199.10));
        assert_eq!(result.total_monthly_cost, dec!(1599.10));
    }

    // =========================================================================
    // schedule
    // =========================================================================

    #[test]
    fn schedule_pays_off_the_loan() {
        let result = input().calculate().unwrap();

        assert_eq!(result.schedule.len(), 360);
        assert_eq!(result.schedule.last().unwrap().balance, dec!(0));
        let principal: Decimal = result.schedule.iter().map(|r| r.principal).sum();
        assert_eq!(principal, result.loan_amount);
        assert_eq!(result.total_paid, result.loan_amount + result.total_interest);
    }

    #[test]
    fn first_month_split() {
        let result = input().calculate().unwrap();
        let first = &result.schedule[0];

        assert_eq!(first.interest, dec!(1000.00));
        assert_eq!(first.principal, dec!(199.10));
        assert_eq!(first.balance, dec!(199800.90));
    }

    #[test]
    fn yearly_balances_one_per_year() {
        let result = input().calculate().unwrap();
        let yearly = result.yearly_balances();

        assert_eq!(yearly.len(), 30);
        assert_eq!(yearly[29], (30, dec!(0)));
    }

    // =========================================================================
    // validation
    // =========================================================================

    #[test]
    fn down_payment_covering_price_is_rejected() {
        let err = MortgageInput {
            down_payment: dec!(250000),
            ..input()
        }
        .calculate()
        .unwrap_err();

        assert_eq!(err.field, "down_payment");
    }

    #[test]
    fn zero_term_and_negative_rate_are_rejected() {
        let zero_term = MortgageInput {
            term_years: 0,
            ..input()
        };
        let negative_rate = MortgageInput {
            annual_rate: dec!(-0.5),
            ..input()
        };

        assert_eq!(zero_term.calculate().unwrap_err().field, "term_years");
        assert_eq!(negative_rate.calculate().unwrap_err().field, "annual_rate");
    }

    #[test]
    fn term_beyond_fifty_years_is_rejected() {
        let err = MortgageInput {
            term_years: 400_000_000,
            annual_rate: dec!(0),
            ..input()
        }
        .calculate()
        .unwrap_err();

        assert_eq!(err.field, "term_years");
        assert_eq!(err.message, "must be at most 50");
        assert!(MortgageInput { term_years: 51, ..input() }.calculate().is_err());
    }

    #[test]
    fn fifty_year_term_is_accepted() {
        let result = MortgageInput {
            term_years: MAX_TERM_YEARS,
            ..input()
        }
        .calculate()
        .unwrap();

        assert_eq!(result.schedule.len(), 600);
    }

    #[test]
    fn loan_too_large_to_total_is_rejected() {
        let err = MortgageInput {
            home_price: Decimal::MAX,
            down_payment: dec!(0),
            ..input()
        }
        .calculate()
        .unwrap_err();

        assert_eq!(err.field, "home_price");
        assert_eq!(err.message, "value is too large to compute");
    }
}
