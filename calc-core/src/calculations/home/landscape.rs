//! Gravel and mulch quantities for a bed of uniform depth.
//!
//! Volume is `area × depth`, converted to cubic yards for weight and price
//! (materials are sold by the yard) and to bags using each material's bag
//! size.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{ensure_positive, round_half_up, too_large};
use crate::error::CalcResult;
use crate::presentation::format::{decimal_to_f64, format_currency, format_decimal};
use crate::presentation::{BarSeries, ChartSpec, Present, Report};

const INCHES_PER_FOOT: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const CUBIC_FEET_PER_YARD: Decimal = Decimal::from_parts(27, 0, 0, false, 0);
// 0.0283168
const CUBIC_METRES_PER_FOOT: Decimal = Decimal::from_parts(283_168, 0, 0, false, 7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    PeaGravel,
    CrushedStone,
    RiverRock,
    HardwoodMulch,
    PineBarkMulch,
    RubberMulch,
}

/// Reference data for one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialSpec {
    pub name: &'static str,
    pub tons_per_cubic_yard: Decimal,
    pub bag_cubic_feet: Decimal,
    pub price_per_cubic_yard: Decimal,
}

impl Material {
    pub const ALL: [Self; 6] = [
        Self::PeaGravel,
        Self::CrushedStone,
        Self::RiverRock,
        Self::HardwoodMulch,
        Self::PineBarkMulch,
        Self::RubberMulch,
    ];

    pub fn spec(&self) -> MaterialSpec {
        let (name, tons, bag, price) = match self {
            Self::PeaGravel => ("Pea gravel", Decimal::new(140, 2), Decimal::new(5, 1), 45),
            Self::CrushedStone => ("Crushed stone", Decimal::new(135, 2), Decimal::new(5, 1), 40),
            Self::RiverRock => ("River rock", Decimal::new(135, 2), Decimal::new(5, 1), 80),
            Self::HardwoodMulch => ("Hardwood mulch", Decimal::new(40, 2), Decimal::TWO, 35),
            Self::PineBarkMulch => ("Pine bark mulch", Decimal::new(35, 2), Decimal::TWO, 40),
            Self::RubberMulch => ("Rubber mulch", Decimal::new(45, 2), Decimal::new(8, 1), 150),
        };
        MaterialSpec {
            name,
            tons_per_cubic_yard: tons,
            bag_cubic_feet: bag,
            price_per_cubic_yard: Decimal::from(price),
        }
    }

    /// Accepts e.g. `pea-gravel`, `pea_gravel`, `Pea gravel`.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL.into_iter().find(|m| {
            m.spec()
                .name
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .eq(wanted.chars())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaShape {
    Rectangle { length_ft: Decimal, width_ft: Decimal },
    Circle { diameter_ft: Decimal },
}

impl AreaShape {
    fn area(&self) -> CalcResult<Decimal> {
        match *self {
            Self::Rectangle { length_ft, width_ft } => ensure_positive(length_ft, "length_ft")?
                .checked_mul(ensure_positive(width_ft, "width_ft")?)
                .ok_or_else(|| too_large("width_ft")),
            Self::Circle { diameter_ft } => {
                let radius = ensure_positive(diameter_ft, "diameter_ft")? / Decimal::TWO;
                radius
                    .checked_mul(radius)
                    .and_then(|squared| squared.checked_mul(Decimal::PI))
                    .ok_or_else(|| too_large("diameter_ft"))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandscapeInput {
    pub shape: AreaShape,
    pub depth_in: Decimal,
    pub material: Material,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandscapeResult {
    pub input: LandscapeInput,
    pub area_sqft: Decimal,
    pub cubic_feet: Decimal,
    pub cubic_yards: Decimal,
    pub cubic_metres: Decimal,
    pub weight_tons: Decimal,
    pub bags: u64,
    pub estimated_cost: Decimal,
}

impl LandscapeInput {
    pub fn calculate(&self) -> CalcResult<LandscapeResult> {
        let area = self.shape.area()?;
        let depth = ensure_positive(self.depth_in, "depth_in")?;
        let spec = self.material.spec();

        let cubic_feet = area
            .checked_mul(depth)
            .ok_or_else(|| too_large("depth_in"))?
            / INCHES_PER_FOOT;
        let cubic_yards = cubic_feet / CUBIC_FEET_PER_YARD;
        let bags = (cubic_feet / spec.bag_cubic_feet)
            .ceil()
            .to_u64()
            .ok_or_else(|| too_large("depth_in"))?;

        Ok(LandscapeResult {
            input: *self,
            area_sqft: round_half_up(area),
            cubic_feet: round_half_up(cubic_feet),
            cubic_yards: round_half_up(cubic_yards),
            cubic_metres: round_half_up(cubic_feet * CUBIC_METRES_PER_FOOT),
            weight_tons: round_half_up(cubic_yards * spec.tons_per_cubic_yard),
            bags,
            estimated_cost: round_half_up(cubic_yards * spec.price_per_cubic_yard),
        })
    }
}

impl Present for LandscapeResult {
    fn report(&self) -> Report {
        let spec = self.input.material.spec();
        Report::new(format!("Landscape Material: {}", spec.name))
            .line("Area", format!("{} sq ft", format_decimal(self.area_sqft, 2)))
            .line("Volume", format!("{} cu ft", format_decimal(self.cubic_feet, 2)))
            .line("Cubic yards", format_decimal(self.cubic_yards, 2))
            .line("Cubic metres", format_decimal(self.cubic_metres, 2))
            .line("Weight", format!("{} tons", format_decimal(self.weight_tons, 2)))
            .line(
                "Bags",
                format!("{} ({} cu ft each)", self.bags, spec.bag_cubic_feet.normalize()),
            )
            .line("Estimated cost", format_currency(self.estimated_cost))
            .with_chart(ChartSpec::Bar {
                title: "Cost by material".to_string(),
                categories: Material::ALL.iter().map(|m| m.spec().name.to_string()).collect(),
                series: vec![BarSeries {
                    name: "cost".to_string(),
                    values: Material::ALL
                        .iter()
                        .map(|m| {
                            let yards = self.cubic_feet / CUBIC_FEET_PER_YARD;
                            decimal_to_f64(round_half_up(yards * m.spec().price_per_cubic_yard))
                        })
                        .collect(),
                }],
            })
    }
}
