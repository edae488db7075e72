//! Basal metabolic rate, daily energy expenditure and a macro split.
//!
//! BMR follows Mifflin-St Jeor with weight in kg, height in cm and age in
//! years:
//!
//! ```text
//! male:   10w + 6.25h − 5a + 5
//! female: 10w + 6.25h − 5a − 161
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::common::ensure_positive_f64;
use crate::error::{CalcResult, ValidationError};
use crate::models::{Sex, UnitSystem};
use crate::presentation::format::format_number;
use crate::presentation::{ChartSpec, Present, Report, Slice};

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;
const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [Self; 5] = [
        Self::Sedentary,
        Self::Light,
        Self::Moderate,
        Self::Active,
        Self::VeryActive,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very-active",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|level| level.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    Lose,
    #[default]
    Maintain,
    Gain,
}

impl Goal {
    pub fn adjustment(&self) -> f64 {
        match self {
            Self::Lose => -GOAL_ADJUSTMENT_KCAL,
            Self::Maintain => 0.0,
            Self::Gain => GOAL_ADJUSTMENT_KCAL,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lose" => Some(Self::Lose),
            "maintain" => Some(Self::Maintain),
            "gain" => Some(Self::Gain),
            _ => None,
        }
    }
}

/// Mifflin-St Jeor BMR, unrounded.
pub fn mifflin_st_jeor(
    sex: Sex,
    weight_kg: f64,
    height_cm: f64,
    age: u32,
) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrInput {
    pub sex: Sex,
    pub age: u32,
    pub unit_system: UnitSystem,
    /// Kilograms or pounds.
    pub weight: f64,
    /// Centimetres or inches.
    pub height: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

/// Grams per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmrResult {
    pub bmr: u32,
    pub tdee: u32,
    pub target_calories: u32,
    pub macros: Macros,
}

impl BmrInput {
    pub fn calculate(&self) -> CalcResult<BmrResult> {
        let weight = ensure_positive_f64(self.weight, "weight")?;
        let height = ensure_positive_f64(self.height, "height")?;
        if self.age == 0 || self.age > 120 {
            return Err(ValidationError::invalid("age", "must be between 1 and 120"));
        }

        let bmr = mifflin_st_jeor(
            self.sex,
            self.unit_system.weight_to_kg(weight),
            self.unit_system.height_to_cm(height),
            self.age,
        );
        if bmr <= 0.0 {
            return Err(ValidationError::invalid(
                "weight",
                "measurements give a non-positive metabolic rate",
            ));
        }
        let tdee = bmr * self.activity.multiplier();
        let target = (tdee + self.goal.adjustment()).max(0.0);

        Ok(BmrResult {
            bmr: bmr.round() as u32,
            tdee: tdee.round() as u32,
            target_calories: target.round() as u32,
            macros: Macros {
                protein_g: (target * 0.30 / KCAL_PER_GRAM_PROTEIN).round() as u32,
                carbs_g: (target * 0.40 / KCAL_PER_GRAM_CARBS).round() as u32,
                fat_g: (target * 0.30 / KCAL_PER_GRAM_FAT).round() as u32,
            },
        })
    }
}

impl Present for BmrResult {
    fn report(&self) -> Report {
        let kcal = |v: u32| format!("{} kcal", format_number(f64::from(v), 0));
        let grams = |v: u32| format!("{v} g");
        Report::new("Calories")
            .line("BMR", kcal(self.bmr))
            .line("TDEE", kcal(self.tdee))
            .line("Target calories", kcal(self.target_calories))
            .line("Protein", grams(self.macros.protein_g))
            .line("Carbohydrates", grams(self.macros.carbs_g))
            .line("Fat", grams(self.macros.fat_g))
            .with_chart(ChartSpec::Pie {
                title: "Macronutrient calories".to_string(),
                slices: vec![
                    Slice::new("Protein", f64::from(self.macros.protein_g) * KCAL_PER_GRAM_PROTEIN),
                    Slice::new("Carbohydrates", f64::from(self.macros.carbs_g) * KCAL_PER_GRAM_CARBS),
                    Slice::new("Fat", f64::from(self.macros.fat_g) * KCAL_PER_GRAM_FAT),
                ],
            })
    }
}
