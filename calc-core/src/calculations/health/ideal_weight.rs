//! Ideal body weight by four classic formulas.
//!
//! Each formula is a base weight at 5 ft (60 in) plus a fixed increment per
//! inch above it; heights below 5 ft subtract the same increment per inch.
//!
//! | Formula  | Male            | Female          |
//! |----------|-----------------|-----------------|
//! | Robinson | 52 + 1.9 kg/in  | 49 + 1.7 kg/in  |
//! | Miller   | 56.2 + 1.41 kg/in | 53.1 + 1.36 kg/in |
//! | Devine   | 50 + 2.3 kg/in  | 45.5 + 2.3 kg/in |
//! | Hamwi    | 48 + 2.7 kg/in  | 45.5 + 2.2 kg/in |

use serde::{Deserialize, Serialize};

use crate::calculations::common::ensure_positive_f64;
use crate::error::CalcResult;
use crate::models::{CM_PER_INCH, KG_PER_LB, Sex, UnitSystem};
use crate::presentation::format::format_number;
use crate::presentation::{BarSeries, ChartSpec, Present, Report};

const BASE_HEIGHT_IN: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightFormula {
    Robinson,
    Miller,
    Devine,
    Hamwi,
}

impl WeightFormula {
    pub const ALL: [Self; 4] = [Self::Robinson, Self::Miller, Self::Devine, Self::Hamwi];

    /// `(base kg, kg per inch)`.
    fn coefficients(
        &self,
        sex: Sex,
    ) -> (f64, f64) {
        match (self, sex) {
            (Self::Robinson, Sex::Male) => (52.0, 1.9),
            (Self::Robinson, Sex::Female) => (49.0, 1.7),
            (Self::Miller, Sex::Male) => (56.2, 1.41),
            (Self::Miller, Sex::Female) => (53.1, 1.36),
            (Self::Devine, Sex::Male) => (50.0, 2.3),
            (Self::Devine, Sex::Female) => (45.5, 2.3),
            (Self::Hamwi, Sex::Male) => (48.0, 2.7),
            (Self::Hamwi, Sex::Female) => (45.5, 2.2),
        }
    }

    /// Ideal weight in kg for a height in inches.
    pub fn ideal_kg(
        &self,
        sex: Sex,
        height_in: f64,
    ) -> f64 {
        let (base, per_inch) = self.coefficients(sex);
        base + per_inch * (height_in - BASE_HEIGHT_IN)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Robinson => "Robinson (1983)",
            Self::Miller => "Miller (1983)",
            Self::Devine => "Devine (1974)",
            Self::Hamwi => "Hamwi (1964)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightInput {
    pub sex: Sex,
    pub unit_system: UnitSystem,
    /// Centimetres or inches.
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightResult {
    pub input: IdealWeightInput,
    /// One entry per formula, in [`WeightFormula::ALL`] order.
    pub by_formula: Vec<(WeightFormula, f64)>,
    pub average_kg: f64,
}

impl IdealWeightInput {
    pub fn calculate(&self) -> CalcResult<IdealWeightResult> {
        let height = ensure_positive_f64(self.height, "height")?;
        let height_in = self.unit_system.height_to_cm(height) / CM_PER_INCH;

        let by_formula: Vec<_> = WeightFormula::ALL
            .into_iter()
            .map(|f| (f, f.ideal_kg(self.sex, height_in)))
            .collect();
        let average_kg = by_formula.iter().map(|(_, kg)| kg).sum::<f64>() / by_formula.len() as f64;

        Ok(IdealWeightResult {
            input: *self,
            by_formula,
            average_kg,
        })
    }
}

impl IdealWeightResult {
    /// Converts a kg figure into the input's weight unit.
    fn display_weight(
        &self,
        kg: f64,
    ) -> f64 {
        match self.input.unit_system {
            UnitSystem::Metric => kg,
            UnitSystem::Imperial => kg / KG_PER_LB,
        }
    }
}

impl Present for IdealWeightResult {
    fn report(&self) -> Report {
        let unit = match self.input.unit_system {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        };
        let mut report = Report::new("Ideal Weight");
        for (formula, kg) in &self.by_formula {
            report = report.line(
                formula.name(),
                format!("{} {unit}", format_number(self.display_weight(*kg), 1)),
            );
        }
        report
            .line(
                "Average",
                format!("{} {unit}", format_number(self.display_weight(self.average_kg), 1)),
            )
            .with_chart(ChartSpec::Bar {
                title: "Ideal weight by formula".to_string(),
                categories: self.by_formula.iter().map(|(f, _)| f.name().to_string()).collect(),
                series: vec![BarSeries {
                    name: unit.to_string(),
                    values: self
                        .by_formula
                        .iter()
                        .map(|(_, kg)| self.display_weight(*kg))
                        .collect(),
                }],
            })
    }
}
