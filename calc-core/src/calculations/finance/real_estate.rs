//! Rental property yield: capitalization rate and cash-on-cash return.
//!
//! ```text
//! NOI           = gross rent − vacancy loss − operating expenses
//! cap rate      = NOI / property value × 100
//! cash flow     = NOI − annual debt service
//! cash-on-cash  = cash flow / total cash invested × 100
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{ensure_non_negative, ensure_positive, round_half_up};
use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::{decimal_to_f64, format_currency, format_percent};
use crate::presentation::{BarSeries, ChartSpec, Present, Report};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealEstateInput {
    pub property_value: Decimal,
    pub gross_annual_rent: Decimal,
    /// Percent of gross rent lost to vacancy.
    pub vacancy_rate: Decimal,
    pub annual_operating_expenses: Decimal,
    /// Annual mortgage principal and interest; zero for a cash purchase.
    pub annual_debt_service: Decimal,
    /// Down payment, closing costs and repairs.
    pub total_cash_invested: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealEstateResult {
    pub input: RealEstateInput,
    pub vacancy_loss: Decimal,
    pub net_operating_income: Decimal,
    /// Percent.
    pub cap_rate: Decimal,
    pub annual_cash_flow: Decimal,
    pub monthly_cash_flow: Decimal,
    /// Percent.
    pub cash_on_cash: Decimal,
}

impl RealEstateInput {
    pub fn calculate(&self) -> CalcResult<RealEstateResult> {
        let value = ensure_positive(self.property_value, "property_value")?;
        let invested = ensure_positive(self.total_cash_invested, "total_cash_invested")?;
        ensure_non_negative(self.gross_annual_rent, "gross_annual_rent")?;
        ensure_non_negative(self.annual_operating_expenses, "annual_operating_expenses")?;
        ensure_non_negative(self.annual_debt_service, "annual_debt_service")?;
        if self.vacancy_rate < Decimal::ZERO || self.vacancy_rate > Decimal::ONE_HUNDRED {
            return Err(ValidationError::invalid(
                "vacancy_rate",
                "must be between 0 and 100",
            ));
        }

        let vacancy_loss = round_half_up(self.gross_annual_rent * self.vacancy_rate / Decimal::ONE_HUNDRED);
        let noi = self.gross_annual_rent - vacancy_loss - self.annual_operating_expenses;
        let cash_flow = noi - self.annual_debt_service;

        Ok(RealEstateResult {
            input: self.clone(),
            vacancy_loss,
            net_operating_income: noi,
            cap_rate: round_half_up(noi / value * Decimal::ONE_HUNDRED),
            annual_cash_flow: cash_flow,
            monthly_cash_flow: round_half_up(cash_flow / Decimal::from(12)),
            cash_on_cash: round_half_up(cash_flow / invested * Decimal::ONE_HUNDRED),
        })
    }
}

impl Present for RealEstateResult {
    fn report(&self) -> Report {
        let categories = ["Gross rent", "Vacancy", "Expenses", "Debt service", "Cash flow"];
        let values = [
            self.input.gross_annual_rent,
            self.vacancy_loss,
            self.input.annual_operating_expenses,
            self.input.annual_debt_service,
            self.annual_cash_flow,
        ];
        Report::new("Real Estate Returns")
            .line("Net operating income", format_currency(self.net_operating_income))
            .line("Cap rate", format_percent(self.cap_rate, 2))
            .line("Annual cash flow", format_currency(self.annual_cash_flow))
            .line("Monthly cash flow", format_currency(self.monthly_cash_flow))
            .line("Cash-on-cash return", format_percent(self.cash_on_cash, 2))
            .with_chart(ChartSpec::Bar {
                title: "Annual income and costs".to_string(),
                categories: categories.iter().map(|c| c.to_string()).collect(),
                series: vec![BarSeries {
                    name: "amount".to_string(),
                    values: values.iter().map(|v| decimal_to_f64(*v)).collect(),
                }],
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input() -> RealEstateInput {
        RealEstateInput {
            property_value: dec!(500000),
            gross_annual_rent: dec!(48000),
            vacancy_rate: dec!(5),
            annual_operating_expenses: dec!(12000),
            annual_debt_service: dec!(18000),
            total_cash_invested: dec!(125000),
        }
    }

    #[test]
    fn cap_rate_and_cash_on_cash() {
        let result = input().calculate().unwrap();

        assert_eq!(result.vacancy_loss, dec!(2400.00));
        assert_eq!(result.net_operating_income, dec!(33600.00));
        assert_eq!(result.cap_rate, dec!(6.72));
        assert_eq!(result.annual_cash_flow, dec!(15600.00));
        assert_eq!(result.monthly_cash_flow, dec!(1300.00));
        assert_eq!(result.cash_on_cash, dec!(12.48));
    }

    #[test]
    fn negative_cash_flow_is_reported_not_rejected() {
        let result = RealEstateInput {
            annual_debt_service: dec!(40000),
            ..input()
        }
        .calculate()
        .unwrap();

        assert_eq!(result.annual_cash_flow, dec!(-6400.00));
        assert_eq!(result.cash_on_cash, dec!(-5.12));
    }

    #[test]
    fn zero_value_or_investment_is_rejected() {
        let no_value = RealEstateInput {
            property_value: dec!(0),
            ..input()
        };
        let no_cash = RealEstateInput {
            total_cash_invested: dec!(0),
            ..input()
        };

        assert_eq!(no_value.calculate().unwrap_err().field, "property_value");
        assert_eq!(no_cash.calculate().unwrap_err().field, "total_cash_invested");
    }

    #[test]
    fn vacancy_above_hundred_is_rejected() {
        let err = RealEstateInput {
            vacancy_rate: dec!(120),
            ..input()
        }
        .calculate()
        .unwrap_err();

        assert_eq!(err.field, "vacancy_rate");
    }
}
