//! Per-cell coercion of currency, date and favorite values.
//!
//! None of these functions fail: values that cannot be understood become
//! missing (`None`) or `false`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

/// Everything that is not an ASCII digit or a decimal point.
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").unwrap());

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d-%b-%Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

// =============================================================================
// CURRENCY
// =============================================================================

/// Parse a currency string by stripping every non-digit, non-dot character.
///
/// `"$1,234.50 USD"` parses as `1234.5`; `"TBD"` and `"1.2.3"` are missing.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let digits = NON_NUMERIC.replace_all(raw, "");
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a value as whole dollars with thousands separators, e.g. `$1,235`.
pub fn format_currency(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let grouped = group_thousands(&rounded);
    if value < 0.0 && rounded != "0" {
        format!("$-{}", grouped)
    } else {
        format!("${}", grouped)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// DATES
// =============================================================================

/// Parse a calendar date, dropping any time component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    if let Some(date) = parse_us_date(value) {
        return Some(date);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// `MM/DD/YYYY` or `MM/DD/YY`, picked by the width of the year.
fn parse_us_date(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let fmt = if parts[2].len() == 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
    NaiveDate::parse_from_str(value, fmt).ok()
}

// =============================================================================
// FAVORITE
// =============================================================================

/// `TRUE`/`FALSE` in any case; anything else is `false`.
pub fn parse_favorite(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}
