//! Percentage arithmetic.
//!
//! Five question forms, each a variant of [`PercentageQuery`]. Answers are
//! exact [`Decimal`] values rounded to ten places.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{checked_add, checked_div, checked_mul, checked_sub};
use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::{decimal_to_f64, format_decimal};
use crate::presentation::{ChartSpec, Present, Report, Slice};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const RESULT_PLACES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeDirection {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PercentageQuery {
    /// What is `percent`% of `value`?
    PercentOf { percent: Decimal, value: Decimal },
    /// `part` is what percent of `whole`?
    WhatPercent { part: Decimal, whole: Decimal },
    /// Percentage change from `original` to `new`.
    Change { original: Decimal, new: Decimal },
    /// `value` increased or decreased by `percent`%.
    ApplyChange {
        value: Decimal,
        percent: Decimal,
        direction: ChangeDirection,
    },
    /// Percentage difference between two values, relative to their mean.
    Difference { a: Decimal, b: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageResult {
    pub query: PercentageQuery,
    pub answer: Decimal,
    /// Plain-language restatement, e.g. `"15% of 200 = 30"`.
    pub explanation: String,
}

/// `x · p / 100`.
pub fn percent_of(
    percent: Decimal,
    value: Decimal,
) -> CalcResult<Decimal> {
    Ok(checked_mul(value, percent, "value")? / HUNDRED)
}

/// `part / whole · 100`; a zero whole is rejected.
pub fn what_percent(
    part: Decimal,
    whole: Decimal,
) -> CalcResult<Decimal> {
    if whole.is_zero() {
        return Err(ValidationError::invalid("whole", "cannot be zero"));
    }
    checked_mul(checked_div(part, whole, "part")?, HUNDRED, "part")
}

/// `(new - original) / |original| · 100`; a zero original is rejected.
pub fn percentage_change(
    original: Decimal,
    new: Decimal,
) -> CalcResult<Decimal> {
    if original.is_zero() {
        return Err(ValidationError::invalid(
            "original",
            "original value cannot be zero",
        ));
    }
    let delta = checked_sub(new, original, "new")?;
    checked_mul(checked_div(delta, original.abs(), "new")?, HUNDRED, "new")
}

/// `|a - b| / ((a + b) / 2) · 100`; a zero mean is rejected.
pub fn percentage_difference(
    a: Decimal,
    b: Decimal,
) -> CalcResult<Decimal> {
    let mean = checked_add(a / Decimal::TWO, b / Decimal::TWO, "b")?;
    if mean.is_zero() {
        return Err(ValidationError::invalid("b", "values average to zero"));
    }
    let gap = checked_sub(a, b, "b")?.abs();
    checked_mul(checked_div(gap, mean.abs(), "b")?, HUNDRED, "b")
}

impl PercentageQuery {
    pub fn calculate(&self) -> CalcResult<PercentageResult> {
        let (answer, explanation) = match *self {
            Self::PercentOf { percent, value } => {
                let answer = round(percent_of(percent, value)?);
                (answer, format!("{percent}% of {value} = {answer}"))
            }
            Self::WhatPercent { part, whole } => {
                let answer = round(what_percent(part, whole)?);
                (answer, format!("{part} is {answer}% of {whole}"))
            }
            Self::Change { original, new } => {
                let answer = round(percentage_change(original, new)?);
                let word = if answer.is_sign_negative() { "decrease" } else { "increase" };
                (
                    answer,
                    format!("{original} to {new} is a {}% {word}", answer.abs()),
                )
            }
            Self::ApplyChange {
                value,
                percent,
                direction,
            } => {
                let delta = percent_of(percent, value)?;
                let answer = round(match direction {
                    ChangeDirection::Increase => checked_add(value, delta, "percent")?,
                    ChangeDirection::Decrease => checked_sub(value, delta, "percent")?,
                });
                let word = match direction {
                    ChangeDirection::Increase => "increased",
                    ChangeDirection::Decrease => "decreased",
                };
                (answer, format!("{value} {word} by {percent}% = {answer}"))
            }
            Self::Difference { a, b } => {
                let answer = round(percentage_difference(a, b)?);
                (
                    answer,
                    format!("the difference between {a} and {b} is {answer}%"),
                )
            }
        };

        Ok(PercentageResult {
            query: *self,
            answer,
            explanation,
        })
    }
}

fn round(value: Decimal) -> Decimal {
    value.round_dp(RESULT_PLACES).normalize()
}

impl Present for PercentageResult {
    fn report(&self) -> Report {
        let report = Report::new("Percentage")
            .line("Answer", format_decimal(self.answer, 4))
            .line("Explanation", self.explanation.clone());

        // Only the part-of-whole forms have a meaningful split to draw.
        let split = match self.query {
            PercentageQuery::PercentOf { value, .. } => {
                value.checked_sub(self.answer).map(|rest| (self.answer, rest))
            }
            PercentageQuery::WhatPercent { part, whole } => {
                whole.checked_sub(part).map(|rest| (part, rest))
            }
            _ => None,
        };
        match split {
            Some((part, rest)) if part >= Decimal::ZERO && rest >= Decimal::ZERO => {
                report.with_chart(ChartSpec::Pie {
                    title: "Share of total".to_string(),
                    slices: vec![
                        Slice::new("Part", decimal_to_f64(part)),
                        Slice::new("Remainder", decimal_to_f64(rest)),
                    ],
                })
            }
            _ => report,
        }
    }
}
