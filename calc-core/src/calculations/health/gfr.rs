//! Estimated glomerular filtration rate (CKD-EPI 2021 creatinine equation).
//!
//! ```text
//! eGFR = 142 · min(Scr/κ, 1)^α · max(Scr/κ, 1)^−1.200 · 0.9938^age · (1.012 if female)
//! ```
//!
//! with serum creatinine `Scr` in mg/dL, κ = 0.7 (female) / 0.9 (male) and
//! α = −0.241 (female) / −0.302 (male).

use serde::{Deserialize, Serialize};

use crate::calculations::common::ensure_positive_f64;
use crate::error::{CalcResult, ValidationError};
use crate::models::Sex;
use crate::presentation::format::format_number;
use crate::presentation::{ChartSpec, GaugeBand, Present, Report};

const MIN_ADULT_AGE: u32 = 18;

/// KDIGO stage of chronic kidney disease, by eGFR in mL/min/1.73m².
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GfrStage {
    G1,
    G2,
    G3a,
    G3b,
    G4,
    G5,
}

impl GfrStage {
    pub fn from_egfr(egfr: f64) -> Self {
        if egfr >= 90.0 {
            Self::G1
        } else if egfr >= 60.0 {
            Self::G2
        } else if egfr >= 45.0 {
            Self::G3a
        } else if egfr >= 30.0 {
            Self::G3b
        } else if egfr >= 15.0 {
            Self::G4
        } else {
            Self::G5
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::G1 => "G1",
            Self::G2 => "G2",
            Self::G3a => "G3a",
            Self::G3b => "G3b",
            Self::G4 => "G4",
            Self::G5 => "G5",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::G1 => "Normal or high",
            Self::G2 => "Mildly decreased",
            Self::G3a => "Mildly to moderately decreased",
            Self::G3b => "Moderately to severely decreased",
            Self::G4 => "Severely decreased",
            Self::G5 => "Kidney failure",
        }
    }
}

/// Unrounded eGFR.
pub fn ckd_epi_2021(
    sex: Sex,
    age: u32,
    creatinine_mg_dl: f64,
) -> f64 {
    let (kappa, alpha, sex_factor) = match sex {
        Sex::Female => (0.7, -0.241, 1.012),
        Sex::Male => (0.9, -0.302, 1.0),
    };
    let ratio = creatinine_mg_dl / kappa;
    142.0
        * ratio.min(1.0).powf(alpha)
        * ratio.max(1.0).powf(-1.200)
        * 0.9938_f64.powi(age as i32)
        * sex_factor
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GfrInput {
    pub sex: Sex,
    pub age: u32,
    pub creatinine_mg_dl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GfrResult {
    pub input: GfrInput,
    /// mL/min/1.73m², rounded to a whole number.
    pub egfr: u32,
    pub stage: GfrStage,
}

impl GfrInput {
    pub fn calculate(&self) -> CalcResult<GfrResult> {
        let creatinine = ensure_positive_f64(self.creatinine_mg_dl, "creatinine_mg_dl")?;
        if self.age < MIN_ADULT_AGE {
            return Err(ValidationError::invalid(
                "age",
                "the equation is only valid for adults (18+)",
            ));
        }

        let egfr = ckd_epi_2021(self.sex, self.age, creatinine);
        Ok(GfrResult {
            input: *self,
            egfr: egfr.round() as u32,
            stage: GfrStage::from_egfr(egfr),
        })
    }
}

impl Present for GfrResult {
    fn report(&self) -> Report {
        Report::new("eGFR (CKD-EPI 2021)")
            .line("eGFR", format!("{} mL/min/1.73m²", self.egfr))
            .line("Stage", format!("{} ({})", self.stage.code(), self.stage.description()))
            .line("Creatinine", format!("{} mg/dL", format_number(self.input.creatinine_mg_dl, 2)))
            .with_chart(ChartSpec::Gauge {
                title: "eGFR".to_string(),
                value: f64::from(self.egfr).min(120.0),
                min: 0.0,
                max: 120.0,
                bands: vec![
                    GaugeBand::new("G5", 0.0, 15.0),
                    GaugeBand::new("G4", 15.0, 30.0),
                    GaugeBand::new("G3b", 30.0, 45.0),
                    GaugeBand::new("G3a", 45.0, 60.0),
                    GaugeBand::new("G2", 60.0, 90.0),
                    GaugeBand::new("G1", 90.0, 120.0),
                ],
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn female_at_kappa_has_no_creatinine_term() {
        let result = GfrInput {
            sex: Sex::Female,
            age: 60,
            creatinine_mg_dl: 0.7,
        }
        .calculate()
        .unwrap();

        // 142 · 0.9938^60 · 1.012
        assert_eq!(result.egfr, 99);
        assert_eq!(result.stage, GfrStage::G1);
    }

    #[test]
    fn male_above_kappa() {
        let egfr = ckd_epi_2021(Sex::Male, 50, 1.0);

        assert!((egfr - 91.7).abs() < 0.1, "got {egfr}");
    }

    #[test]
    fn high_creatinine_lowers_stage() {
        let result = GfrInput {
            sex: Sex::Male,
            age: 70,
            creatinine_mg_dl: 4.0,
        }
        .calculate()
        .unwrap();

        assert!(result.stage >= GfrStage::G4, "got {:?}", result.stage);
    }

    #[test]
    fn stage_boundaries() {
        assert_eq!(GfrStage::from_egfr(90.0), GfrStage::G1);
        assert_eq!(GfrStage::from_egfr(59.9), GfrStage::G3a);
        assert_eq!(GfrStage::from_egfr(44.0), GfrStage::G3b);
        assert_eq!(GfrStage::from_egfr(14.9), GfrStage::G5);
    }

    #[test]
    fn rejects_minors_and_non_positive_creatinine() {
        let minor = GfrInput {
            sex: Sex::Male,
            age: 17,
            creatinine_mg_dl: 1.0,
        };
        let zero = GfrInput {
            sex: Sex::Male,
            age: 40,
            creatinine_mg_dl: 0.0,
        };

        assert_eq!(minor.calculate().unwrap_err().field, "age");
        assert_eq!(zero.calculate().unwrap_err().field, "creatinine_mg_dl");
    }
}
