//! Display formatting for amounts and dates, fixed to the `en-IN` locale.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "INR";

/// India Standard Time, UTC+05:30.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;
const INVALID_DATE: &str = "Invalid Date";
/// 2^53. Every float at or above this is an integer.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
}

fn currency_style(code: &str) -> (String, u32) {
    match code {
        "INR" => ("₹".to_string(), 2),
        "USD" => ("$".to_string(), 2),
        "EUR" => ("€".to_string(), 2),
        "GBP" => ("£".to_string(), 2),
        "JPY" => ("JP¥".to_string(), 0),
        other => (format!("{other}\u{a0}"), 2),
    }
}

/// Groups an integer digit string the Indian way: `1234567` -> `12,34,567`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut rest, last_three) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while rest.len() > 2 {
        let (head, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = head;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{}", groups.join(","), last_three)
}

/// Formats `amount` as currency, e.g. `format_currency(1000.0, "INR")` -> `₹1,000.00`.
pub fn format_currency(amount: f64, currency: &str) -> Result<String, FormatError> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(FormatError::InvalidCurrency(currency.to_string()));
    }
    let (symbol, fraction_digits) = currency_style(&currency.to_ascii_uppercase());

    if amount.is_nan() {
        return Ok(format!("{symbol}NaN"));
    }
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    if amount.is_infinite() {
        return Ok(format!("{sign}{symbol}∞"));
    }

    let scale = 10u64.pow(fraction_digits);
    let abs = amount.abs();
    let (whole, fraction) = if abs < EXACT_INTEGER_LIMIT {
        let units = (abs * scale as f64).round() as u64;
        ((units / scale).to_string(), units % scale)
    } else {
        // Shortest round-trip digits, no exponent
        (format!("{abs}"), 0)
    };
    let whole = group_indian(&whole);

    if fraction_digits == 0 {
        return Ok(format!("{sign}{symbol}{whole}"));
    }
    Ok(format!(
        "{sign}{symbol}{whole}.{fraction:0width$}",
        width = fraction_digits as usize
    ))
}

/// Shorthand for [`DEFAULT_CURRENCY`].
pub fn format_inr(amount: f64) -> String {
    format_currency(amount, DEFAULT_CURRENCY).unwrap_or_default()
}

fn india() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Parses the date strings the page hands us into an IST instant.
fn parse_instant(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    let ist = india();

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&ist));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return ist.from_local_datetime(&naive).single();
        }
    }
    // Date-only strings are UTC midnight
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight).with_timezone(&ist))
}

/// `2026-10-14` -> `14 October 2026`.
pub fn format_date(input: &str) -> String {
    parse_instant(input)
        .map(|instant| instant.format("%-d %B %Y").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// `2026-10-14T15:45:00+05:30` -> `14 October 2026 at 03:45 pm`.
pub fn format_date_time(input: &str) -> String {
    parse_instant(input)
        .map(|instant| instant.format("%-d %B %Y at %I:%M %P").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}
