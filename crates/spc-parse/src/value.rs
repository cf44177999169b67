//! Cell value parsing
//!
//! Dates accept ISO `YYYY-M-D` (anything after the day is ignored) and
//! day-first `D/M/YYYY` or `D-M-YYYY`, where two-digit years mean 20xx.
//! Numbers accept plain decimals and simple percentages, which keep their
//! percentage value (`"55.17%"` is `55.17`).
//!
//! Neither parser fails loudly: an unparseable cell is `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use spc_core::CellValue;

lazy_static! {
    // Hard-coded patterns, known to be valid
    #[allow(clippy::expect_used)]
    static ref ISO_DATE: Regex =
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})").expect("ISO date pattern should be valid");
    #[allow(clippy::expect_used)]
    static ref DAY_FIRST_DATE: Regex = Regex::new(r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})$")
        .expect("day-first date pattern should be valid");
    #[allow(clippy::expect_used)]
    static ref PERCENT: Regex =
        Regex::new(r"^(-?\d+(?:\.\d+)?)\s*%$").expect("percent pattern should be valid");
}

const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%a %b %d %Y",
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &["%Y/%m/%d %H:%M:%S", "%Y/%m/%d %H:%M"];

/// Parse a table cell as a calendar date
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => parse_date_str(s),
        CellValue::Number(_) | CellValue::Empty => None,
    }
}

/// Parse text as a calendar date
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use spc_parse::parse_date_str;
///
/// let feb13 = NaiveDate::from_ymd_opt(2024, 2, 13);
/// assert_eq!(parse_date_str("13/02/2024"), feb13);
/// assert_eq!(parse_date_str("2024-02-13T09:30:00"), feb13);
/// assert_eq!(parse_date_str("not a date"), None);
/// ```
pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DAY_FIRST_DATE.captures(s) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    parse_date_fallback(s)
}

fn parse_date_fallback(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    if let Some(d) = FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(d.date());
    }
    if let Some(d) = FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
    {
        return Some(d);
    }
    // Month and year only ("Mar 2024", "March 2024") mean the first of the month
    let with_day = format!("1 {s}");
    ["%d %b %Y", "%d %B %Y"]
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(&with_day, f).ok())
}

/// Parse a table cell as a finite number
pub fn parse_numeric(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => n.is_finite().then_some(*n),
        CellValue::Text(s) => parse_numeric_str(s),
        CellValue::Date(_) | CellValue::Empty => None,
    }
}

/// Parse text as a finite number, accepting a trailing `%`
///
/// # Examples
///
/// ```rust
/// use spc_parse::parse_numeric_str;
///
/// assert_eq!(parse_numeric_str("55.17 %"), Some(55.17));
/// assert_eq!(parse_numeric_str(" 42 "), Some(42.0));
/// assert_eq!(parse_numeric_str("12,3"), None);
/// ```
pub fn parse_numeric_str(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = PERCENT.captures(s) {
        return caps[1].parse::<f64>().ok();
    }

    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Whether a piece of text reads as a value rather than a heading
pub fn looks_like_data(raw: &str) -> bool {
    parse_numeric_str(raw).is_some() || parse_date_str(raw).is_some()
}
