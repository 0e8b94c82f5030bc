//! Display formatting for market figures
//!
//! Pure functions turning raw upstream numbers and timestamps into the strings
//! shown to users. All of them are total: input that cannot be rendered
//! (non-finite numbers, unparseable timestamps) produces a sentinel instead of
//! an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::*;

use crate::data::{NOT_AVAILABLE, NO_CHANGE};

const TRILLION: f64 = 1e12;
const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;

/// Formats a value as en-US currency without a symbol: two decimals and
/// comma thousands separators (`1234.5` → `"1,234.50"`).
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let fixed = to_fixed_2(value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, group_thousands(int_part), frac_part)
}

/// Abbreviates large values with a T/B/M suffix, falling back to currency
/// formatting below one million. Thresholds are inclusive, so exactly
/// `1e12` renders as `"1.00T"`.
pub fn format_large_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    if value >= TRILLION {
        format!("{}T", to_fixed_2(value / TRILLION))
    } else if value >= BILLION {
        format!("{}B", to_fixed_2(value / BILLION))
    } else if value >= MILLION {
        format!("{}M", to_fixed_2(value / MILLION))
    } else {
        format_currency(value)
    }
}

/// Formats a 24h percentage change to two decimals, without grouping
pub fn format_change(value: f64) -> String {
    if !value.is_finite() {
        return NO_CHANGE.to_string();
    }
    to_fixed_2(value)
}

/// Renders an ISO-like timestamp as `"Jan 15, 10:30 AM"` in UTC.
///
/// Accepts RFC 3339 (`2024-01-15T10:30:00.000Z`), naive date-times
/// (`2024-01-15T10:30:00`, `2024-01-15T10:30`) and bare dates. Anything else
/// renders as `"N/A"`.
pub fn format_date(timestamp: &str) -> String {
    match parse_timestamp(timestamp.trim()) {
        Some(dt) => dt.format("%b %-d, %I:%M %p").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Two-decimal rendering of the exact binary value, midpoints rounded away
/// from zero (`2.125` → `"2.13"`, while `1.005`, stored just below, → `"1.00"`)
fn to_fixed_2(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded.to_string()
        }
        // Beyond Decimal's range every f64 is an integer, so there is no midpoint
        None => format!("{:.2}", value),
    }
}

/// Inserts a comma every three digits from the right
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}
