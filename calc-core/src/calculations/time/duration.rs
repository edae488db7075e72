//! Date-time arithmetic: differences, shifting by a span, and conversion
//! between fixed UTC offsets.

use chrono::{FixedOffset, NaiveDateTime, TimeDelta, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{CalcResult, ValidationError};
use crate::presentation::format::format_number;
use crate::presentation::{BarSeries, ChartSpec, Present, Report};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;
/// Real-world offsets span UTC−12 to UTC+14.
const MAX_OFFSET_HOURS: f64 = 14.0;
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A non-negative days/hours/minutes/seconds breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeSpan {
    /// Splits a magnitude in seconds into its components.
    pub fn from_seconds(total: i64) -> Self {
        let total = total.abs();
        Self {
            days: total / SECONDS_PER_DAY,
            hours: total % SECONDS_PER_DAY / SECONDS_PER_HOUR,
            minutes: total % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
            seconds: total % SECONDS_PER_MINUTE,
        }
    }

    pub fn total_seconds(&self) -> Option<i64> {
        self.days
            .checked_mul(SECONDS_PER_DAY)?
            .checked_add(self.hours.checked_mul(SECONDS_PER_HOUR)?)?
            .checked_add(self.minutes.checked_mul(SECONDS_PER_MINUTE)?)?
            .checked_add(self.seconds)
    }
}

impl std::fmt::Display for TimeSpan {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceResult {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Negative when `end` precedes `start`.
    pub total_seconds: i64,
    pub span: TimeSpan,
}

/// Elapsed time from `start` to `end`.
pub fn difference(
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> DifferenceResult {
    let total_seconds = end.signed_duration_since(start).num_seconds();
    DifferenceResult {
        start,
        end,
        total_seconds,
        span: TimeSpan::from_seconds(total_seconds),
    }
}

impl DifferenceResult {
    pub fn total_hours(&self) -> f64 {
        self.total_seconds as f64 / SECONDS_PER_HOUR as f64
    }

    pub fn total_days(&self) -> f64 {
        self.total_seconds as f64 / SECONDS_PER_DAY as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftDirection {
    Add,
    Subtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftResult {
    pub start: NaiveDateTime,
    pub span: TimeSpan,
    pub direction: ShiftDirection,
    pub result: NaiveDateTime,
}

/// Moves `start` forward or backward by `span`.
pub fn shift(
    start: NaiveDateTime,
    span: TimeSpan,
    direction: ShiftDirection,
) -> CalcResult<ShiftResult> {
    let too_far = || ValidationError::invalid("span", "result is outside the supported date range");
    let seconds = span.total_seconds().ok_or_else(too_far)?;
    let delta = TimeDelta::try_seconds(seconds).ok_or_else(too_far)?;
    let result = match direction {
        ShiftDirection::Add => start.checked_add_signed(delta),
        ShiftDirection::Subtract => start.checked_sub_signed(delta),
    }
    .ok_or_else(too_far)?;

    Ok(ShiftResult {
        start,
        span,
        direction,
        result,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetConversion {
    pub source: NaiveDateTime,
    /// Seconds east of UTC.
    pub from_offset_secs: i32,
    pub to_offset_secs: i32,
    pub converted: NaiveDateTime,
}

fn offset(
    hours: f64,
    field: &str,
) -> CalcResult<FixedOffset> {
    if !hours.is_finite() || hours.abs() > MAX_OFFSET_HOURS {
        return Err(ValidationError::invalid(
            field,
            "offset must be between -14 and +14 hours",
        ));
    }
    FixedOffset::east_opt((hours * SECONDS_PER_HOUR as f64).round() as i32)
        .ok_or_else(|| ValidationError::invalid(field, "invalid UTC offset"))
}

/// Re-expresses a wall-clock time at UTC`from_hours` as wall-clock time at
/// UTC`to_hours`. Offsets may be fractional (e.g. `5.5`, `-3.5`).
pub fn convert_offset(
    local: NaiveDateTime,
    from_hours: f64,
    to_hours: f64,
) -> CalcResult<OffsetConversion> {
    let from = offset(from_hours, "from_offset")?;
    let to = offset(to_hours, "to_offset")?;
    let converted = from
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| ValidationError::invalid("datetime", "ambiguous local time"))?
        .with_timezone(&to)
        .naive_local();

    Ok(OffsetConversion {
        source: local,
        from_offset_secs: from.local_minus_utc(),
        to_offset_secs: to.local_minus_utc(),
        converted,
    })
}

impl Present for DifferenceResult {
    fn report(&self) -> Report {
        let direction = if self.total_seconds < 0 { " (end is before start)" } else { "" };
        Report::new("Time Difference")
            .line("From", self.start.format(DISPLAY_FORMAT).to_string())
            .line("To", self.end.format(DISPLAY_FORMAT).to_string())
            .line("Difference", format!("{}{direction}", self.span))
            .line("Total hours", format_number(self.total_hours(), 2))
            .line("Total days", format_number(self.total_days(), 2))
            .with_chart(ChartSpec::Bar {
                title: "Breakdown".to_string(),
                categories: ["Days", "Hours", "Minutes", "Seconds"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                series: vec![BarSeries {
                    name: "span".to_string(),
                    values: vec![
                        self.span.days as f64,
                        self.span.hours as f64,
                        self.span.minutes as f64,
                        self.span.seconds as f64,
                    ],
                }],
            })
    }
}

impl Present for ShiftResult {
    fn report(&self) -> Report {
        let verb = match self.direction {
            ShiftDirection::Add => "Added",
            ShiftDirection::Subtract => "Subtracted",
        };
        Report::new("Date Arithmetic")
            .line("Start", self.start.format(DISPLAY_FORMAT).to_string())
            .line(verb, self.span.to_string())
            .line("Result", self.result.format(DISPLAY_FORMAT).to_string())
    }
}

/// `+05:30` style label for an offset in seconds.
fn offset_label(secs: i32) -> String {
    FixedOffset::east_opt(secs).map_or_else(|| format!("{secs}s"), |o| o.to_string())
}

impl Present for OffsetConversion {
    fn report(&self) -> Report {
        Report::new("Time Zone Conversion")
            .line(
                "Source",
                format!("{} UTC{}", self.source.format(DISPLAY_FORMAT), offset_label(self.from_offset_secs)),
            )
            .line(
                "Converted",
                format!("{} UTC{}", self.converted.format(DISPLAY_FORMAT), offset_label(self.to_offset_secs)),
            )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(
        y: i32,
        mo: u32,
        d: u32,
        h: u32,
        mi: u32,
    ) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    // =========================================================================
    // difference
    // =========================================================================

    #[test]
    fn difference_breakdown() {
        let result = difference(at(2024, 1, 1, 8, 0), at(2024, 1, 3, 10, 30));

        assert_eq!(result.total_seconds, 2 * 86_400 + 2 * 3_600 + 30 * 60);
        assert_eq!(
            result.span,
            TimeSpan {
                days: 2,
                hours: 2,
                minutes: 30,
                seconds: 0
            }
        );
        assert_eq!(result.span.to_string(), "2d 2h 30m 0s");
    }

    #[test]
    fn difference_backwards_is_negative_with_positive_span() {
        let result = difference(at(2024, 1, 2, 0, 0), at(2024, 1, 1, 0, 0));

        assert_eq!(result.total_seconds, -86_400);
        assert_eq!(result.span.days, 1);
        assert_eq!(result.total_days(), -1.0);
    }

    #[test]
    fn difference_across_leap_day() {
        let result = difference(at(2024, 2, 28, 0, 0), at(2024, 3, 1, 0, 0));

        assert_eq!(result.span.days, 2);
    }

    // =========================================================================
    // shift
    // =========================================================================

    #[test]
    fn add_and_subtract_span() {
        let span = TimeSpan {
            days: 1,
            hours: 20,
            minutes: 0,
            seconds: 0,
        };

        let later = shift(at(2024, 12, 31, 6, 0), span, ShiftDirection::Add).unwrap();
        let earlier = shift(at(2024, 12, 31, 6, 0), span, ShiftDirection::Subtract).unwrap();

        assert_eq!(later.result, at(2025, 1, 2, 2, 0));
        assert_eq!(earlier.result, at(2024, 12, 29, 10, 0));
    }

    #[test]
    fn shift_out_of_range_is_rejected() {
        let span = TimeSpan {
            days: i64::MAX,
            ..Default::default()
        };

        let err = shift(at(2024, 1, 1, 0, 0), span, ShiftDirection::Add).unwrap_err();

        assert_eq!(err.field, "span");
    }

    // =========================================================================
    // convert_offset
    // =========================================================================

    #[test]
    fn convert_between_offsets() {
        let result = convert_offset(at(2024, 6, 1, 9, 0), -5.0, 5.5).unwrap();

        assert_eq!(result.converted, at(2024, 6, 1, 19, 30));
        assert_eq!(result.to_offset_secs, 19_800);
        assert_eq!(result.report().value_of("Converted"), Some("2024-06-01 19:30:00 UTC+05:30"));
    }

    #[test]
    fn convert_crosses_midnight() {
        let result = convert_offset(at(2024, 6, 1, 23, 0), 0.0, 9.0).unwrap();

        assert_eq!(result.converted, at(2024, 6, 2, 8, 0));
    }

    #[test]
    fn offsets_beyond_fourteen_hours_are_rejected() {
        let err = convert_offset(at(2024, 6, 1, 0, 0), 0.0, 15.0).unwrap_err();

        assert_eq!(err.field, "to_offset");
    }
}
