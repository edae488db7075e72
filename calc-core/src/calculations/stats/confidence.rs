//! Confidence interval for a population mean with known standard deviation.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{ensure_finite, ensure_positive_f64};
use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::format_number;
use crate::presentation::{ChartSpec, LineSeries, Present, Report};

const CURVE_POINTS: usize = 100;
const CURVE_HALF_WIDTH_SE: f64 = 4.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    P90,
    #[default]
    P95,
    P99,
}

impl ConfidenceLevel {
    pub const ALL: [Self; 3] = [Self::P90, Self::P95, Self::P99];

    /// Two-sided critical value of the standard normal distribution.
    pub fn z(&self) -> f64 {
        match self {
            Self::P90 => 1.645,
            Self::P95 => 1.96,
            Self::P99 => 2.576,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::P90 => "90%",
            Self::P95 => "95%",
            Self::P99 => "99%",
        }
    }

    /// Accepts `90`, `95`, `99` with or without a trailing `%`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().trim_end_matches('%') {
            "90" => Some(Self::P90),
            "95" => Some(Self::P95),
            "99" => Some(Self::P99),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInput {
    pub mean: f64,
    pub std_dev: f64,
    pub sample_size: u64,
    pub level: ConfidenceLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    pub input: ConfidenceInput,
    pub standard_error: f64,
    pub z: f64,
    pub margin_of_error: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInput {
    pub fn calculate(&self) -> CalcResult<ConfidenceResult> {
        let mean = ensure_finite(self.mean, "mean")?;
        let std_dev = ensure_positive_f64(self.std_dev, "std_dev")?;
        if self.sample_size < 1 {
            return Err(ValidationError::invalid(
                "sample_size",
                "must be at least 1",
            ));
        }

        let standard_error = std_dev / (self.sample_size as f64).sqrt();
        let z = self.level.z();
        let margin_of_error = z * standard_error;
        debug!(mean, standard_error, margin_of_error, "confidence interval");

        Ok(ConfidenceResult {
            input: *self,
            standard_error,
            z,
            margin_of_error,
            lower: mean - margin_of_error,
            upper: mean + margin_of_error,
        })
    }
}

impl ConfidenceResult {
    /// Normal density of the sampling distribution of the mean, sampled over
    /// `mean ± 4·SE`.
    pub fn curve(&self) -> Vec<[f64; 2]> {
        let se = self.standard_error;
        let start = self.input.mean - CURVE_HALF_WIDTH_SE * se;
        let step = 2.0 * CURVE_HALF_WIDTH_SE * se / (CURVE_POINTS - 1) as f64;
        let norm = 1.0 / (se * (2.0 * PI).sqrt());
        (0..CURVE_POINTS)
            .map(|i| {
                let x = start + step * i as f64;
                let z = (x - self.input.mean) / se;
                [x, norm * (-0.5 * z * z).exp()]
            })
            .collect()
    }
}

impl Present for ConfidenceResult {
    fn report(&self) -> Report {
        Report::new("Confidence Interval")
            .line("Confidence level", self.input.level.label())
            .line("Standard error", format_number(self.standard_error, 4))
            .line("z-score", format_number(self.z, 3))
            .line("Margin of error", format!("±{}", format_number(self.margin_of_error, 4)))
            .line(
                "Interval",
                format!(
                    "({}, {})",
                    format_number(self.lower, 4),
                    format_number(self.upper, 4)
                ),
            )
            .with_chart(ChartSpec::Line {
                title: "Sampling distribution".to_string(),
                x_label: "mean".to_string(),
                y_label: "density".to_string(),
                series: vec![LineSeries {
                    name: "normal".to_string(),
                    points: self.curve(),
                }],
            })
    }
}
