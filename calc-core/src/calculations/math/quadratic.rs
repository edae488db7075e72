//! Quadratic formula solver for `ax² + bx + c = 0`.
//!
//! The discriminant `D = b² − 4ac` selects the root case:
//!
//! | D     | Roots |
//! |-------|-------|
//! | `> 0` | two distinct real roots `(-b ± √D) / 2a` |
//! | `= 0` | one repeated real root `-b / 2a` |
//! | `< 0` | complex conjugate pair `re ± im·i` |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::common::ensure_finite;
use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::format_number;
use crate::presentation::{ChartSpec, LineSeries, Present, Report};

const CURVE_POINTS: usize = 100;

/// Coefficients of `ax² + bx + c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticInput {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// The root case selected by the discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QuadraticRoots {
    /// Distinct real roots, smaller first.
    TwoReal(f64, f64),
    Repeated(f64),
    /// `real ± imaginary·i`, with `imaginary > 0`.
    Complex { real: f64, imaginary: f64 },
}

impl fmt::Display for QuadraticRoots {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::TwoReal(x1, x2) => write!(f, "x = {}, x = {}", trim(*x1), trim(*x2)),
            Self::Repeated(x) => write!(f, "x = {}", trim(*x)),
            Self::Complex { real, imaginary } => write!(
                f,
                "x = {} - {}i, x = {} + {}i",
                trim(*real),
                trim(*imaginary),
                trim(*real),
                trim(*imaginary)
            ),
        }
    }
}

/// Up to four decimals, trailing zeros removed.
fn trim(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticResult {
    pub input: QuadraticInput,
    pub discriminant: f64,
    pub roots: QuadraticRoots,
    /// `(x, y)` of the parabola's turning point.
    pub vertex: (f64, f64),
    pub axis_of_symmetry: f64,
}

impl QuadraticInput {
    fn evaluate(
        &self,
        x: f64,
    ) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    /// Solves the equation.
    ///
    /// # Errors
    ///
    /// `a == 0` is rejected as not quadratic; non-finite coefficients are
    /// rejected.
    pub fn solve(&self) -> CalcResult<QuadraticResult> {
        let a = ensure_finite(self.a, "a")?;
        let b = ensure_finite(self.b, "b")?;
        ensure_finite(self.c, "c")?;
        if a == 0.0 {
            return Err(ValidationError::invalid(
                "a",
                "coefficient a cannot be zero (not quadratic)",
            ));
        }

        let discriminant = b * b - 4.0 * a * self.c;
        let two_a = 2.0 * a;

        let roots = if discriminant > 0.0 {
            let sqrt_d = discriminant.sqrt();
            let r1 = (-b + sqrt_d) / two_a;
            let r2 = (-b - sqrt_d) / two_a;
            QuadraticRoots::TwoReal(r1.min(r2), r1.max(r2))
        } else if discriminant == 0.0 {
            QuadraticRoots::Repeated(-b / two_a)
        } else {
            QuadraticRoots::Complex {
                real: -b / two_a,
                imaginary: ((-discriminant).sqrt() / two_a).abs(),
            }
        };

        let axis = -b / two_a;
        Ok(QuadraticResult {
            input: *self,
            discriminant,
            roots,
            vertex: (axis, self.evaluate(axis)),
            axis_of_symmetry: axis,
        })
    }
}

impl QuadraticResult {
    /// Samples the parabola on a window centred on the vertex that also
    /// covers any real roots.
    pub fn curve(&self) -> Vec<[f64; 2]> {
        let (vx, _) = self.vertex;
        let half_width = match self.roots {
            QuadraticRoots::TwoReal(x1, x2) => ((x2 - x1) / 2.0).abs() * 1.5,
            _ => 0.0,
        }
        .max(5.0);
        let start = vx - half_width;
        let step = 2.0 * half_width / (CURVE_POINTS - 1) as f64;
        (0..CURVE_POINTS)
            .map(|i| {
                let x = start + step * i as f64;
                [x, self.input.evaluate(x)]
            })
            .collect()
    }
}

impl Present for QuadraticResult {
    fn report(&self) -> Report {
        let root_type = match self.roots {
            QuadraticRoots::TwoReal(..) => "Two distinct real roots",
            QuadraticRoots::Repeated(_) => "One repeated real root",
            QuadraticRoots::Complex { .. } => "Complex conjugate roots",
        };
        Report::new("Quadratic Formula")
            .line("Discriminant", format_number(self.discriminant, 4))
            .line("Root type", root_type)
            .line("Roots", self.roots.to_string())
            .line(
                "Vertex",
                format!("({}, {})", trim(self.vertex.0), trim(self.vertex.1)),
            )
            .line("Axis of symmetry", format!("x = {}", trim(self.axis_of_symmetry)))
            .with_chart(ChartSpec::Line {
                title: "y = ax² + bx + c".to_string(),
                x_label: "x".to_string(),
                y_label: "y".to_string(),
                series: vec![LineSeries {
                    name: "parabola".to_string(),
                    points: self.curve(),
                }],
            })
    }
}
