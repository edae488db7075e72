//! Number formatting for result panels.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Inserts `,` thousands separators into the integer part of a plain
/// decimal string such as `"-1234567.89"`.
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats a float with a fixed number of decimals and thousands separators.
pub fn format_number(
    value: f64,
    decimals: usize,
) -> String {
    let plain = format!("{value:.decimals$}");
    // "-0.00" reads badly on a result panel
    if plain.starts_with('-') && plain.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        return group_thousands(plain.trim_start_matches('-'));
    }
    group_thousands(&plain)
}

/// Formats a decimal rounded half-away-from-zero to `decimals` places.
pub fn format_decimal(
    value: Decimal,
    decimals: u32,
) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let mut plain = rounded.abs().to_string();
    let current = plain.split_once('.').map_or(0, |(_, f)| f.len()) as u32;
    if decimals > 0 && current == 0 {
        plain.push('.');
    }
    for _ in current..decimals {
        plain.push('0');
    }
    let grouped = group_thousands(&plain);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats a money amount as `$1,234.56` (or `-$1,234.56`).
pub fn format_currency(value: Decimal) -> String {
    let formatted = format_decimal(value, 2);
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${formatted}"),
    }
}

/// Formats a percentage value (already scaled by 100) as `12.34%`.
pub fn format_percent(
    value: Decimal,
    decimals: u32,
) -> String {
    format!("{}%", format_decimal(value, decimals))
}

/// Lossy conversion for chart coordinates.
pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}
