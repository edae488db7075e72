use serde::{Deserialize, Serialize};

/// Measurement system selected on a calculator form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

pub const KG_PER_LB: f64 = 0.453_592_37;
pub const CM_PER_INCH: f64 = 2.54;

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "si" => Some(Self::Metric),
            "imperial" | "us" => Some(Self::Imperial),
            _ => None,
        }
    }

    /// Converts a weight entered in this system to kilograms.
    pub fn weight_to_kg(
        &self,
        weight: f64,
    ) -> f64 {
        match self {
            Self::Metric => weight,
            Self::Imperial => weight * KG_PER_LB,
        }
    }

    /// Converts a height entered in this system (cm or inches) to centimetres.
    pub fn height_to_cm(
        &self,
        height: f64,
    ) -> f64 {
        match self {
            Self::Metric => height,
            Self::Imperial => height * CM_PER_INCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imperial_conversions() {
        assert!((UnitSystem::Imperial.weight_to_kg(100.0) - 45.359237).abs() < 1e-9);
        assert!((UnitSystem::Imperial.height_to_cm(70.0) - 177.8).abs() < 1e-9);
    }

    #[test]
    fn metric_is_identity() {
        assert_eq!(UnitSystem::Metric.weight_to_kg(70.0), 70.0);
        assert_eq!(UnitSystem::Metric.height_to_cm(175.0), 175.0);
    }

    #[test]
    fn parse_known_names() {
        assert_eq!(UnitSystem::parse("Imperial"), Some(UnitSystem::Imperial));
        assert_eq!(UnitSystem::parse("metric"), Some(UnitSystem::Metric));
        assert_eq!(UnitSystem::parse("cubits"), None);
    }
}
