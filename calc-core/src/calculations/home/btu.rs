//! Air-conditioner sizing for a single room.

use serde::{Deserialize, Serialize};

use crate::calculations::common::ensure_positive_f64;
use crate::error::CalcResult;
use crate::presentation::format::format_number;
use crate::presentation::{BarSeries, ChartSpec, Present, Report};

const BTU_PER_SQFT: f64 = 20.0;
const STANDARD_CEILING_FT: f64 = 8.0;
const SUN_ADJUSTMENT: f64 = 0.10;
const INCLUDED_OCCUPANTS: u32 = 2;
const BTU_PER_EXTRA_OCCUPANT: f64 = 600.0;
const KITCHEN_BTU: f64 = 4000.0;
const BTU_PER_TON: f64 = 12_000.0;
const WATTS_PER_BTU_HOUR: f64 = 0.293_071;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SunExposure {
    Shaded,
    #[default]
    Average,
    Sunny,
}

impl SunExposure {
    fn factor(&self) -> f64 {
        match self {
            Self::Shaded => 1.0 - SUN_ADJUSTMENT,
            Self::Average => 1.0,
            Self::Sunny => 1.0 + SUN_ADJUSTMENT,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shaded" | "shady" => Some(Self::Shaded),
            "average" | "normal" => Some(Self::Average),
            "sunny" => Some(Self::Sunny),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BtuInput {
    pub length_ft: f64,
    pub width_ft: f64,
    pub ceiling_height_ft: f64,
    pub sun: SunExposure,
    pub occupants: u32,
    pub is_kitchen: bool,
}

impl Default for BtuInput {
    fn default() -> Self {
        Self {
            length_ft: 12.0,
            width_ft: 15.0,
            ceiling_height_ft: STANDARD_CEILING_FT,
            sun: SunExposure::Average,
            occupants: INCLUDED_OCCUPANTS,
            is_kitchen: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BtuResult {
    pub area_sqft: f64,
    /// Area load before adjustments.
    pub base_btu: f64,
    /// Whole BTU per hour.
    pub btu: f64,
    pub tons: f64,
    pub watts: f64,
}

impl BtuInput {
    pub fn calculate(&self) -> CalcResult<BtuResult> {
        let length = ensure_positive_f64(self.length_ft, "length_ft")?;
        let width = ensure_positive_f64(self.width_ft, "width_ft")?;
        let height = ensure_positive_f64(self.ceiling_height_ft, "ceiling_height_ft")?;

        let area = length * width;
        let base_btu = area * BTU_PER_SQFT;
        let mut btu = base_btu;
        if height > STANDARD_CEILING_FT {
            btu *= height / STANDARD_CEILING_FT;
        }
        btu *= self.sun.factor();
        btu += f64::from(self.occupants.saturating_sub(INCLUDED_OCCUPANTS)) * BTU_PER_EXTRA_OCCUPANT;
        if self.is_kitchen {
            btu += KITCHEN_BTU;
        }
        let btu = btu.round();

        Ok(BtuResult {
            area_sqft: area,
            base_btu,
            btu,
            tons: btu / BTU_PER_TON,
            watts: btu * WATTS_PER_BTU_HOUR,
        })
    }
}

impl Present for BtuResult {
    fn report(&self) -> Report {
        Report::new("Cooling Capacity")
            .line("Room area", format!("{} sq ft", format_number(self.area_sqft, 0)))
            .line("Required capacity", format!("{} BTU/h", format_number(self.btu, 0)))
            .line("Tons", format_number(self.tons, 2))
            .line("Watts", format!("{} W", format_number(self.watts, 0)))
            .with_chart(ChartSpec::Bar {
                title: "Cooling load".to_string(),
                categories: vec!["Base".to_string(), "Adjusted".to_string()],
                series: vec![BarSeries {
                    name: "BTU/h".to_string(),
                    values: vec![self.base_btu, self.btu],
                }],
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn standard_room() {
        let result = BtuInput::default().calculate().unwrap();

        assert_eq!(result.area_sqft, 180.0);
        assert_eq!(result.btu, 3600.0);
        assert_eq!(result.tons, 0.3);
    }

    #[test]
    fn tall_ceiling_scales_load() {
        let result = BtuInput {
            ceiling_height_ft: 10.0,
            ..Default::default()
        }
        .calculate()
        .unwrap();

        assert_eq!(result.btu, 4500.0);
    }

    #[test]
    fn sunny_crowded_kitchen() {
        let result = BtuInput {
            sun: SunExposure::Sunny,
            occupants: 4,
            is_kitchen: true,
            ..Default::default()
        }
        .calculate()
        .unwrap();

        // 3600 × 1.1 + 2 × 600 + 4000
        assert_eq!(result.btu, 9160.0);
    }

    #[test]
    fn shaded_room() {
        let result = BtuInput {
            sun: SunExposure::Shaded,
            ..Default::default()
        }
        .calculate()
        .unwrap();

        assert_eq!(result.btu, 3240.0);
    }

    #[test]
    fn watts_conversion() {
        let result = BtuInput::default().calculate().unwrap();

        assert!((result.watts - 1055.0556).abs() < 1e-6);
    }

    #[test]
    fn rejects_zero_dimension() {
        let err = BtuInput {
            width_ft: 0.0,
            ..Default::default()
        }
        .calculate()
        .unwrap_err();

        assert_eq!(err.field, "width_ft");
    }
}
