//! Birthday parsing and age derivation
//!
//! Player birthdays were entered through several generations of the profile
//! form, so the stored strings come in a handful of formats. Formats are tried
//! in a fixed priority order; a string that matches none of them is reported
//! as unparseable rather than failing the request.

use chrono::{DateTime, Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Full Ukrainian month names, January first
const MONTHS_UK: [&str; 12] = [
    "січень",
    "лютий",
    "березень",
    "квітень",
    "травень",
    "червень",
    "липень",
    "серпень",
    "вересень",
    "жовтень",
    "листопад",
    "грудень",
];

/// Full Russian month names, January first
const MONTHS_RU: [&str; 12] = [
    "январь",
    "февраль",
    "март",
    "апрель",
    "май",
    "июнь",
    "июль",
    "август",
    "сентябрь",
    "октябрь",
    "ноябрь",
    "декабрь",
];

// "22-Квітень-2010"
static RE_DAY_MONTHNAME_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})-(\p{Cyrillic}+)-(\d{4})$").unwrap());

// "30-07-2019"
static RE_DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").unwrap());

// "25--2012" (month missing, defaults to January)
static RE_DAY_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})--(\d{4})$").unwrap());

/// Date-only formats accepted by the generic fallback
const GENERIC_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Resolve a Cyrillic month name to its 1-based month number.
/// Ukrainian names are checked before Russian ones.
fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTHS_UK
        .iter()
        .position(|m| *m == lower)
        .or_else(|| MONTHS_RU.iter().position(|m| *m == lower))
        .map(|i| i as u32 + 1)
}

/// Build a calendar date from numeric parts.
///
/// Day must be in [1, 31] and year in [1900, 2100]; `from_ymd_opt` then
/// rejects combinations that do not exist on the calendar (31st of a 30-day
/// month, 29 February outside leap years).
fn checked_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=31).contains(&day) || !(1900..=2100).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_day_monthname_year(s: &str) -> Option<NaiveDate> {
    let caps = RE_DAY_MONTHNAME_YEAR.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    checked_date(year, month, day)
}

fn parse_day_month_year(s: &str) -> Option<NaiveDate> {
    let caps = RE_DAY_MONTH_YEAR.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    checked_date(year, month, day)
}

fn parse_day_year(s: &str) -> Option<NaiveDate> {
    let caps = RE_DAY_YEAR.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let year: i32 = caps[2].parse().ok()?;
    checked_date(year, 1, day)
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    GENERIC_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a stored birthday string into a calendar date.
///
/// Formats are tried in priority order; a format that matches but fails
/// validation falls through to the next one.
pub fn parse_birthday(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    parse_day_monthname_year(s)
        .or_else(|| parse_day_month_year(s))
        .or_else(|| parse_day_year(s))
        .or_else(|| parse_generic(s))
}

/// Whole calendar years between `birth` and `today`.
///
/// One less than the year difference when today's (month, day) has not yet
/// reached the birthday's.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Age in whole years as of `today`, or `None` when the string is unparseable.
pub fn derive_age(raw: &str, today: NaiveDate) -> Option<i32> {
    parse_birthday(raw).map(|birth| age_on(birth, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_ukrainian_month_name() {
        assert_eq!(parse_birthday("15-Квітень-2015"), Some(d(2015, 4, 15)));
        assert_eq!(parse_birthday("01-січень-1999"), Some(d(1999, 1, 1)));
    }

    #[test]
    fn test_parse_russian_month_name() {
        assert_eq!(parse_birthday("07-Август-2008"), Some(d(2008, 8, 7)));
    }

    #[test]
    fn test_month_name_matches_numeric_form() {
        assert_eq!(parse_birthday("15-Квітень-2015"), parse_birthday("15-04-2015"));
    }

    #[test]
    fn test_parse_day_month_year() {
        assert_eq!(parse_birthday("30-07-2019"), Some(d(2019, 7, 30)));
        assert_eq!(parse_birthday("19-12-2008"), Some(d(2008, 12, 19)));
    }

    #[test]
    fn test_leap_day_round_trip() {
        assert_eq!(parse_birthday("29-02-2000"), Some(d(2000, 2, 29)));
        // 2001 is not a leap year; the numeric format rejects it and the
        // generic fallback cannot parse it either
        assert_eq!(parse_birthday("29-02-2001"), None);
    }

    #[test]
    fn test_day_out_of_range_is_unparseable() {
        assert_eq!(parse_birthday("32-01-2010"), None);
        assert_eq!(parse_birthday("31-04-2010"), None);
        assert_eq!(parse_birthday("15-13-2010"), None);
        assert_eq!(parse_birthday("15-01-1899"), None);
    }

    #[test]
    fn test_missing_month_defaults_to_january() {
        assert_eq!(parse_birthday("25--2012"), Some(d(2012, 1, 25)));
        assert_eq!(parse_birthday("09--1996"), Some(d(1996, 1, 9)));
    }

    #[test]
    fn test_generic_iso_formats() {
        assert_eq!(parse_birthday("2015-04-15"), Some(d(2015, 4, 15)));
        assert_eq!(parse_birthday("2015/04/15"), Some(d(2015, 4, 15)));
        assert_eq!(parse_birthday("2015-04-15T10:30:00Z"), Some(d(2015, 4, 15)));
    }

    #[test]
    fn test_unknown_month_name_is_unparseable() {
        assert_eq!(parse_birthday("15-Зима-2015"), None);
    }

    #[test]
    fn test_garbage_is_unparseable() {
        assert_eq!(parse_birthday("not a date"), None);
        assert_eq!(parse_birthday(""), None);
        assert_eq!(parse_birthday("   "), None);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(parse_birthday("  15-04-2015  "), Some(d(2015, 4, 15)));
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let birth = d(2010, 6, 15);
        assert_eq!(age_on(birth, d(2026, 6, 14)), 15);
        assert_eq!(age_on(birth, d(2026, 6, 15)), 16);
        assert_eq!(age_on(birth, d(2026, 6, 16)), 16);
    }

    #[test]
    fn test_derive_age() {
        assert_eq!(derive_age("15-04-2015", d(2026, 8, 6)), Some(11));
        assert_eq!(derive_age("bogus", d(2026, 8, 6)), None);
    }
}
