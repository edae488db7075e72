//! Rounding calculator.
//!
//! Three targets (decimal places, significant figures, nearest multiple)
//! crossed with four modes. Every variant works the same way: scale the
//! value so the rounding position becomes the units digit, apply the mode,
//! and scale back. Values are [`Decimal`] so that `2.345` really is `2.345`.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use calc_core::calculations::math::rounding::{RoundingMode, round_to_decimal, round_to_nearest};
//!
//! assert_eq!(round_to_decimal(dec!(2.345), 2, RoundingMode::Standard), dec!(2.35));
//! assert_eq!(round_to_nearest(dec!(23), dec!(5), RoundingMode::Floor).unwrap(), dec!(20));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::calculations::common::{checked_sub, too_large};
use crate::error::{CalcResult, ValidationError};
use crate::presentation::{BarSeries, ChartSpec, Present, Report};
use crate::presentation::format::decimal_to_f64;

/// How the discarded digits are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Half away from zero.
    #[default]
    Standard,
    Ceiling,
    Floor,
    Truncate,
}

impl RoundingMode {
    pub const ALL: [RoundingMode; 4] = [
        RoundingMode::Standard,
        RoundingMode::Ceiling,
        RoundingMode::Floor,
        RoundingMode::Truncate,
    ];

    fn strategy(self) -> RoundingStrategy {
        match self {
            Self::Standard => RoundingStrategy::MidpointAwayFromZero,
            Self::Ceiling => RoundingStrategy::ToPositiveInfinity,
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
            Self::Truncate => RoundingStrategy::ToZero,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Ceiling => "Ceiling",
            Self::Floor => "Floor",
            Self::Truncate => "Truncate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "round" | "half-up" => Some(Self::Standard),
            "ceiling" | "ceil" | "up" => Some(Self::Ceiling),
            "floor" | "down" => Some(Self::Floor),
            "truncate" | "trunc" => Some(Self::Truncate),
            _ => None,
        }
    }

    /// Rounds to an integer.
    fn apply(
        self,
        value: Decimal,
    ) -> Decimal {
        value.round_dp_with_strategy(0, self.strategy())
    }
}

/// What to round to. Each variant carries only the parameter it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingRequest {
    Decimal { places: u32 },
    Significant { figures: u32 },
    Nearest { multiple: Decimal },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingInput {
    pub value: Decimal,
    pub request: RoundingRequest,
    pub mode: RoundingMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingResult {
    pub input: RoundingInput,
    pub rounded: Decimal,
    /// `rounded - value`.
    pub difference: Decimal,
    /// The same request under every mode, for comparison.
    pub by_mode: Vec<(RoundingMode, Decimal)>,
}

// Decimal supports at most 28 fractional digits.
const MAX_PLACES: u32 = 28;
// and holds at most 29 significant digits
const MAX_FIGURES: u32 = 29;

fn pow10(exp: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..exp {
        result *= Decimal::TEN;
    }
    result
}

/// Exponent of the most significant digit: `123.4 -> 2`, `0.05 -> -2`.
fn magnitude(value: Decimal) -> i32 {
    let mut abs = value.abs();
    let mut exponent = 0;
    while abs >= Decimal::TEN {
        abs /= Decimal::TEN;
        exponent += 1;
    }
    while abs < Decimal::ONE {
        abs *= Decimal::TEN;
        exponent -= 1;
    }
    exponent
}

/// Rounds to `places` digits after the decimal point.
pub fn round_to_decimal(
    value: Decimal,
    places: u32,
    mode: RoundingMode,
) -> Decimal {
    let scale = pow10(places.min(MAX_PLACES));
    match value.checked_mul(scale) {
        Some(scaled) => mode.apply(scaled) / scale,
        // too wide to scale; rounding in place gives the same answer
        None => value.round_dp_with_strategy(places.min(MAX_PLACES), mode.strategy()),
    }
}

/// Rounds to `figures` significant digits.
pub fn round_to_significant(
    value: Decimal,
    figures: u32,
    mode: RoundingMode,
) -> CalcResult<Decimal> {
    if figures == 0 {
        return Err(ValidationError::invalid(
            "figures",
            "must be at least one significant figure",
        ));
    }
    if figures > MAX_FIGURES {
        return Err(ValidationError::invalid(
            "figures",
            format!("must be at most {MAX_FIGURES}"),
        ));
    }
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }

    // both terms are within ±29, so the cast cannot wrap
    let shift = figures as i32 - 1 - magnitude(value);
    if shift >= 0 {
        Ok(round_to_decimal(value, shift as u32, mode))
    } else {
        let scale = pow10(shift.unsigned_abs());
        mode.apply(value / scale)
            .checked_mul(scale)
            .ok_or_else(|| too_large("value"))
    }
}

/// Rounds to the nearest multiple of `multiple` (which must be positive).
pub fn round_to_nearest(
    value: Decimal,
    multiple: Decimal,
    mode: RoundingMode,
) -> CalcResult<Decimal> {
    if multiple <= Decimal::ZERO {
        return Err(ValidationError::invalid(
            "multiple",
            "must be greater than zero",
        ));
    }
    value
        .checked_div(multiple)
        .and_then(|steps| mode.apply(steps).checked_mul(multiple))
        .ok_or_else(|| ValidationError::invalid("multiple", "value is too large for this multiple"))
}

impl RoundingInput {
    fn round_with(
        &self,
        mode: RoundingMode,
    ) -> CalcResult<Decimal> {
        match self.request {
            RoundingRequest::Decimal { places } => {
                if places > MAX_PLACES {
                    return Err(ValidationError::invalid(
                        "places",
                        format!("must be at most {MAX_PLACES}"),
                    ));
                }
                Ok(round_to_decimal(self.value, places, mode))
            }
            RoundingRequest::Significant { figures } => {
                round_to_significant(self.value, figures, mode)
            }
            RoundingRequest::Nearest { multiple } => round_to_nearest(self.value, multiple, mode),
        }
    }

    pub fn calculate(&self) -> CalcResult<RoundingResult> {
        let rounded = self.round_with(self.mode)?.normalize();
        let difference = checked_sub(rounded, self.value, "value")?.normalize();
        let by_mode = RoundingMode::ALL
            .iter()
            .map(|&m| self.round_with(m).map(|r| (m, r.normalize())))
            .collect::<CalcResult<Vec<_>>>()?;

        Ok(RoundingResult {
            input: *self,
            rounded,
            difference,
            by_mode,
        })
    }
}

impl Present for RoundingResult {
    fn report(&self) -> Report {
        let target = match self.input.request {
            RoundingRequest::Decimal { places } => format!("{places} decimal places"),
            RoundingRequest::Significant { figures } => format!("{figures} significant figures"),
            RoundingRequest::Nearest { multiple } => format!("nearest {multiple}"),
        };
        let mut report = Report::new("Rounding")
            .line("Original", self.input.value.to_string())
            .line("Target", target)
            .line("Mode", self.input.mode.label())
            .line("Rounded", self.rounded.to_string())
            .line("Difference", self.difference.to_string());
        for (mode, value) in &self.by_mode {
            report = report.line(format!("{} result", mode.label()), value.to_string());
        }
        report.with_chart(ChartSpec::Bar {
            title: "Result by mode".to_string(),
            categories: self.by_mode.iter().map(|(m, _)| m.label().to_string()).collect(),
            series: vec![BarSeries {
                name: "Rounded".to_string(),
                values: self.by_mode.iter().map(|(_, v)| decimal_to_f64(*v)).collect(),
            }],
        })
    }
}
