use serde::Serialize;

/// A declarative chart description, independent of any charting library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie {
        title: String,
        slices: Vec<Slice>,
    },
    Line {
        title: String,
        x_label: String,
        y_label: String,
        series: Vec<LineSeries>,
    },
    Bar {
        title: String,
        categories: Vec<String>,
        series: Vec<BarSeries>,
    },
    Gauge {
        title: String,
        value: f64,
        min: f64,
        max: f64,
        bands: Vec<GaugeBand>,
    },
    BoxPlot {
        title: String,
        stats: BoxPlotStats,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

impl Slice {
    pub fn new(
        label: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeBand {
    pub label: String,
    pub from: f64,
    pub to: f64,
}

impl GaugeBand {
    pub fn new(
        label: impl Into<String>,
        from: f64,
        to: f64,
    ) -> Self {
        Self {
            label: label.into(),
            from,
            to,
        }
    }
}

/// Five-number summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxPlotStats {
    /// Computes the summary with linear interpolation between order
    /// statistics. Returns `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let quantile = |q: f64| {
            let pos = q * (sorted.len() - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
        };
        Some(Self {
            min: sorted[0],
            q1: quantile(0.25),
            median: quantile(0.5),
            q3: quantile(0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn box_plot_of_one_to_five() {
        let stats = BoxPlotStats::from_values(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();

        assert_eq!(
            stats,
            BoxPlotStats {
                min: 1.0,
                q1: 2.0,
                median: 3.0,
                q3: 4.0,
                max: 5.0,
            }
        );
    }

    #[test]
    fn box_plot_of_empty_is_none() {
        assert_eq!(BoxPlotStats::from_values(&[]), None);
    }

    #[test]
    fn chart_serialises_with_type_tag() {
        let chart = ChartSpec::Pie {
            title: "Split".to_string(),
            slices: vec![Slice::new("A", 1.0)],
        };

        let json = serde_json::to_value(&chart).unwrap();

        assert_eq!(json["type"], "pie");
        assert_eq!(json["slices"][0]["label"], "A");
    }
}
