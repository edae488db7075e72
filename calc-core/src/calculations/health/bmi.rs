//! Body mass index.
//!
//! Metric: `kg / m²`. Imperial: `703 · lb / in²`. Height is entered in
//! centimetres or inches to match the unit system.

use serde::{Deserialize, Serialize};

use crate::calculations::common::{ensure_positive_f64, round_f64};
use crate::error::CalcResult;
use crate::models::UnitSystem;
use crate::presentation::format::format_number;
use crate::presentation::{ChartSpec, GaugeBand, Present, Report};

const IMPERIAL_FACTOR: f64 = 703.0;
const HEALTHY_MIN: f64 = 18.5;
const HEALTHY_MAX: f64 = 24.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiInput {
    pub unit_system: UnitSystem,
    /// Kilograms or pounds.
    pub weight: f64,
    /// Centimetres or inches.
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub input: BmiInput,
    pub bmi: f64,
    pub category: BmiCategory,
    /// Healthy weight range for the height, in the input's weight unit.
    pub healthy_weight: (f64, f64),
}

impl BmiInput {
    pub fn calculate(&self) -> CalcResult<BmiResult> {
        let weight = ensure_positive_f64(self.weight, "weight")?;
        let height = ensure_positive_f64(self.height, "height")?;

        // bmi = factor · weight / height², height in metres or inches
        let (height_sq, factor) = match self.unit_system {
            UnitSystem::Metric => ((height / 100.0).powi(2), 1.0),
            UnitSystem::Imperial => (height.powi(2), IMPERIAL_FACTOR),
        };
        let bmi = factor * weight / height_sq;

        Ok(BmiResult {
            input: *self,
            bmi,
            category: BmiCategory::from_bmi(bmi),
            healthy_weight: (
                round_f64(HEALTHY_MIN * height_sq / factor, 1),
                round_f64(HEALTHY_MAX * height_sq / factor, 1),
            ),
        })
    }
}

impl Present for BmiResult {
    fn report(&self) -> Report {
        let unit = match self.input.unit_system {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        };
        let (low, high) = self.healthy_weight;
        Report::new("Body Mass Index")
            .line("BMI", format_number(self.bmi, 1))
            .line("Category", self.category.label())
            .line(
                "Healthy weight",
                format!("{} - {} {unit}", format_number(low, 1), format_number(high, 1)),
            )
            .with_chart(ChartSpec::Gauge {
                title: "BMI".to_string(),
                value: round_f64(self.bmi, 1),
                min: 10.0,
                max: 40.0,
                bands: vec![
                    GaugeBand::new("Underweight", 10.0, 18.5),
                    GaugeBand::new("Normal", 18.5, 25.0),
                    GaugeBand::new("Overweight", 25.0, 30.0),
                    GaugeBand::new("Obese", 30.0, 40.0),
                ],
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn metric_bmi() {
        let result = BmiInput {
            unit_system: UnitSystem::Metric,
            weight: 70.0,
            height: 175.0,
        }
        .calculate()
        .unwrap();

        assert_eq!(round_f64(result.bmi, 1), 22.9);
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.healthy_weight, (56.7, 76.3));
    }

    #[test]
    fn imperial_bmi() {
        let result = BmiInput {
            unit_system: UnitSystem::Imperial,
            weight: 150.0,
            height: 65.0,
        }
        .calculate()
        .unwrap();

        assert_eq!(round_f64(result.bmi, 2), 24.96);
        assert_eq!(result.category, BmiCategory::Normal);
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn rejects_non_positive_measurements() {
        let err = BmiInput {
            unit_system: UnitSystem::Metric,
            weight: 70.0,
            height: 0.0,
        }
        .calculate()
        .unwrap_err();

        assert_eq!(err.field, "height");
    }
}
