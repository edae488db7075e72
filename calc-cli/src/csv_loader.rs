//! CSV loader for mortgage batch scenarios.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Header names
//! are case-sensitive.
//!
//! | Column                 | Required | Type    | Notes                            |
//! |------------------------|----------|---------|----------------------------------|
//! | `label`                | yes      | string  | Shown in the batch output        |
//! | `home_price`           | yes      | decimal | e.g. `350000.00`                 |
//! | `down_payment`         | yes      | decimal |                                  |
//! | `annual_rate`          | yes      | decimal | Percent, e.g. `6.5`              |
//! | `term_years`           | yes      | integer | e.g. `30`                        |
//! | `monthly_property_tax` | no       | decimal | Empty or missing cell means `0`  |
//! | `monthly_insurance`    | no       | decimal | Empty or missing cell means `0`  |
//! | `monthly_hoa`          | no       | decimal | Empty or missing cell means `0`  |
//!
//! ### Example
//!
//! ```csv
//! label,home_price,down_payment,annual_rate,term_years,monthly_property_tax
//! starter,250000,50000,6.0,30,250
//! upsize,480000,96000,6.75,15,
//! ```

use std::path::Path;

use calc_core::calculations::finance::MortgageInput;
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: String,
    home_price: Decimal,
    down_payment: Decimal,
    annual_rate: Decimal,
    term_years: u32,
    #[serde(default)]
    monthly_property_tax: Option<Decimal>,
    #[serde(default)]
    monthly_insurance: Option<Decimal>,
    #[serde(default)]
    monthly_hoa: Option<Decimal>,
}

/// One named row of a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MortgageScenario {
    pub label: String,
    pub input: MortgageInput,
}

#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("row {row}: label is empty")]
    EmptyLabel { row: usize },
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<MortgageScenario, CsvLoadError> {
    let label = row.label.trim().to_string();
    if label.is_empty() {
        return Err(CsvLoadError::EmptyLabel { row: row_number });
    }

    Ok(MortgageScenario {
        label,
        input: MortgageInput {
            home_price: row.home_price,
            down_payment: row.down_payment,
            annual_rate: row.annual_rate,
            term_years: row.term_years,
            monthly_property_tax: row.monthly_property_tax.unwrap_or_default(),
            monthly_insurance: row.monthly_insurance.unwrap_or_default(),
            monthly_hoa: row.monthly_hoa.unwrap_or_default(),
        },
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parses scenarios from CSV text. Rows are returned in file order; row
/// numbers in errors are 1-based and exclude the header.
///
/// Scenario values are not validated here; that happens when each one is
/// calculated, so one bad scenario does not hide the others.
pub fn load_from_str(data: &str) -> Result<Vec<MortgageScenario>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(data.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(index, record)| {
            let row = record?;
            convert_row(row, index + 1)
        })
        .collect()
}

/// Reads a file from disk and delegates to [load_from_str].
pub fn load_from_path(path: &Path) -> Result<Vec<MortgageScenario>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
