//! Conversion of raw form strings into typed calculator inputs.
//!
//! Every parser trims whitespace and strips `,` thousands separators.
//! Empty input is a [`ValidationError::required`]; anything that does not
//! parse is a [`ValidationError::not_a_number`].

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::{CalcResult, ValidationError};

/// Normalizes input for numeric parsing: trims whitespace and removes commas.
fn normalize_numeric_input(s: &str) -> String {
    s.trim().replace(',', "")
}

fn parse_required<T: FromStr>(
    field: &str,
    raw: &str,
) -> CalcResult<T> {
    let normalized = normalize_numeric_input(raw);
    if normalized.is_empty() {
        return Err(ValidationError::required(field));
    }
    normalized.parse().map_err(|_| {
        tracing::debug!(field, input = %raw, "rejected non-numeric input");
        ValidationError::not_a_number(field, raw)
    })
}

/// Parses a required [`Decimal`] field (e.g. `"1,234.56"`).
pub fn parse_decimal(
    field: &str,
    raw: &str,
) -> CalcResult<Decimal> {
    parse_required(field, raw)
}

/// Parses a required floating-point field. NaN and infinities are rejected.
pub fn parse_f64(
    field: &str,
    raw: &str,
) -> CalcResult<f64> {
    let value: f64 = parse_required(field, raw)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::not_a_number(field, raw))
    }
}

/// Parses a required integer field.
pub fn parse_i64(
    field: &str,
    raw: &str,
) -> CalcResult<i64> {
    parse_required(field, raw)
}

/// Parses an optional [`Decimal`] field; empty input is `None`.
pub fn parse_optional_decimal(
    field: &str,
    raw: &str,
) -> CalcResult<Option<Decimal>> {
    if normalize_numeric_input(raw).is_empty() {
        Ok(None)
    } else {
        parse_decimal(field, raw).map(Some)
    }
}

/// Date-time layouts accepted by [`parse_datetime`], tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a required local date-time such as `2024-03-01 14:30`. A bare
/// date means midnight.
pub fn parse_datetime(
    field: &str,
    raw: &str,
) -> CalcResult<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ValidationError::invalid(field, format!("'{trimmed}' is not a valid date-time")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("amount", "1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(
            parse_decimal("amount", "1,234,567.89").unwrap(),
            dec!(1234567.89)
        );
    }

    #[test]
    fn parse_decimal_trims_whitespace() {
        assert_eq!(parse_decimal("amount", "  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_is_required_error() {
        assert_eq!(
            parse_decimal("amount", "   "),
            Err(ValidationError::required("amount"))
        );
    }

    #[test]
    fn parse_decimal_invalid_names_field() {
        let err = parse_decimal("amount", "abc").unwrap_err();

        assert_eq!(err.field, "amount");
    }

    #[test]
    fn parse_f64_rejects_nan_and_infinity() {
        assert!(parse_f64("x", "NaN").is_err());
        assert!(parse_f64("x", "inf").is_err());
        assert_eq!(parse_f64("x", "2.5").unwrap(), 2.5);
    }

    #[test]
    fn parse_i64_rejects_fractions() {
        assert!(parse_i64("n", "1.5").is_err());
        assert_eq!(parse_i64("n", "-42").unwrap(), -42);
    }

    #[test]
    fn parse_optional_decimal_handles_empty() {
        assert_eq!(parse_optional_decimal("hoa", "").unwrap(), None);
        assert_eq!(
            parse_optional_decimal("hoa", "1,200").unwrap(),
            Some(dec!(1200))
        );
    }

    #[test]
    fn parse_datetime_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();

        assert_eq!(parse_datetime("when", "2024-03-01 14:30"), Ok(expected));
        assert_eq!(parse_datetime("when", "2024-03-01T14:30:00"), Ok(expected));
    }

    #[test]
    fn parse_datetime_bare_date_is_midnight() {
        let parsed = parse_datetime("when", "2024-03-01").unwrap();

        assert_eq!(parsed.to_string(), "2024-03-01 00:00:00");
    }

    #[test]
    fn parse_datetime_rejects_garbage() {
        assert_eq!(
            parse_datetime("when", "  ").unwrap_err(),
            ValidationError::required("when")
        );
        assert_eq!(parse_datetime("when", "yesterday").unwrap_err().field, "when");
    }
}
