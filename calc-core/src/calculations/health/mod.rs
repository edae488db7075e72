//! Body-metric calculators.
//!
//! Each evaluates a published regression equation with sex-conditioned
//! coefficients, then classifies the result into ordered bands. The
//! coefficients are reproduced as published and have not been clinically
//! validated here; none of these results is medical advice.

pub mod bmi;
pub mod bmr;
pub mod gfr;
pub mod ideal_weight;

pub use bmi::{BmiCategory, BmiInput, BmiResult};
pub use bmr::{ActivityLevel, BmrInput, BmrResult, Goal, Macros, mifflin_st_jeor};
pub use gfr::{GfrInput, GfrResult, GfrStage, ckd_epi_2021};
pub use ideal_weight::{IdealWeightInput, IdealWeightResult, WeightFormula};
