//! Pure date arithmetic and display helpers. No I/O, no state.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use crate::error::ParseError;
use crate::lunar;

/// Marker prefix for lunar-tagged date specs (`rYYYY-M-D`).
const LUNAR_TAG: char = 'r';

/// Whole days from `a` to `b`. Negative when `b` precedes `a`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Resolve a date spec to a solar calendar date.
///
/// A spec is either a strict `YYYY-MM-DD` solar date or a lunar date
/// tagged with a leading `r`, which is converted through the lunar
/// calendar before any arithmetic.
pub fn resolve_date(spec: &str) -> Result<NaiveDate, ParseError> {
    if let Some(rest) = spec.strip_prefix(LUNAR_TAG) {
        return resolve_lunar(spec, rest);
    }

    NaiveDate::parse_from_str(spec, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidDate(spec.to_string()))
}

fn resolve_lunar(spec: &str, fields: &str) -> Result<NaiveDate, ParseError> {
    let parts: Vec<&str> = fields.split('-').collect();
    if parts.len() != 3 {
        return Err(ParseError::InvalidLunar(spec.to_string()));
    }

    let year: i32 = parts[0]
        .parse()
        .map_err(|_| ParseError::InvalidLunar(spec.to_string()))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| ParseError::InvalidLunar(spec.to_string()))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| ParseError::InvalidLunar(spec.to_string()))?;

    lunar::lunar_to_solar(year, month, day)
}

/// The next occurrence of `birth`'s calendar date on or after `today`.
///
/// A Feb 29 birth date falls back to Mar 1 in non-leap target years.
pub fn next_occurrence(birth: NaiveDate, today: NaiveDate) -> NaiveDate {
    let this_year = anniversary_in_year(birth, today.year());
    if this_year < today {
        anniversary_in_year(birth, today.year() + 1)
    } else {
        this_year
    }
}

fn anniversary_in_year(date: NaiveDate, year: i32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, date.month(), date.day()) {
        Some(day) => day,
        None => NaiveDate::from_ymd_opt(year, 3, 1).unwrap_or(date),
    }
}

/// A random 24-bit RGB display color, `#rrggbb`.
pub fn random_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..=0xFF_FFFF);
    format!("#{value:06x}")
}
