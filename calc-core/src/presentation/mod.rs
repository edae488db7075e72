//! Result presentation: turns result records into display lines and a
//! declarative chart description.
//!
//! Rendering is left to whatever front end consumes a [`Report`]; the CLI
//! prints the lines and serialises the [`ChartSpec`] to JSON.

mod chart;
pub mod format;

use std::fmt;

use serde::Serialize;

pub use chart::{BarSeries, BoxPlotStats, ChartSpec, GaugeBand, LineSeries, Slice};

/// Implemented by every calculator result record.
pub trait Present {
    fn report(&self) -> Report;
}

/// One labelled value on a result panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub label: String,
    pub value: String,
}

/// Display form of a result record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub lines: Vec<ReportLine>,
    pub chart: Option<ChartSpec>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            chart: None,
        }
    }

    pub fn line(
        mut self,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.lines.push(ReportLine {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_chart(
        mut self,
        chart: ChartSpec,
    ) -> Self {
        self.chart = Some(chart);
        self
    }

    /// Looks up a line's value by label.
    pub fn value_of(
        &self,
        label: &str,
    ) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
    }
}

impl fmt::Display for Report {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "─".repeat(self.title.chars().count().max(20)))?;
        let width = self
            .lines
            .iter()
            .map(|l| l.label.chars().count())
            .max()
            .unwrap_or(0);
        for line in &self.lines {
            writeln!(f, "{:<width$}  {}", line.label, line.value, width = width)?;
        }
        Ok(())
    }
}
