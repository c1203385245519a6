//! Calendar-date primitives shared by the scheduler and the month grid.
//!
//! Every date handled here is a local calendar date ([`NaiveDate`]). Date-only
//! input never passes through an instant, so a daylight-saving transition can
//! not move a release onto a neighbouring day.

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{DATE_FORMAT, DATE_TIME_FORMAT};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid date: {0}")]
    Invalid(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

/// Anything [`parse_date`] accepts: raw text or an already constructed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Text(&'a str),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text.as_str())
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(date_time: NaiveDateTime) -> Self {
        Self::DateTime(date_time)
    }
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%d.%m.%Y"];

fn date_only_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid regex pattern defined in code")
    })
}

/// Parses a calendar date.
///
/// Strict `YYYY-MM-DD` text is read as a local calendar date and must name a
/// real day (`2024-02-30` is rejected rather than rolled over). Other text is
/// tried against RFC 3339, RFC 2822 and a handful of naive layouts; zoned
/// instants are converted to the local date.
///
/// # Errors
///
/// Returns [`DateError::Invalid`] when the text is not a recognizable date.
///
/// # Examples
///
/// ```rust
/// use kalendarr::dates::{format_date, parse_date};
///
/// let date = parse_date("2024-01-08").unwrap();
/// assert_eq!(format_date(date), "2024-01-08");
/// ```
pub fn parse_date<'a>(input: impl Into<DateInput<'a>>) -> Result<NaiveDate, DateError> {
    match input.into() {
        DateInput::Date(date) => Ok(date),
        DateInput::DateTime(date_time) => Ok(date_time.date()),
        DateInput::Text(text) => parse_date_text(text),
    }
}

fn parse_date_text(text: &str) -> Result<NaiveDate, DateError> {
    if date_only_regex().is_match(text) {
        return NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map_err(|_| DateError::Invalid(text.to_string()));
    }

    parse_loose(text.trim()).ok_or_else(|| DateError::Invalid(text.to_string()))
}

fn parse_loose(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Local).date_naive());
    }

    if let Ok(instant) = DateTime::parse_from_rfc2822(text) {
        return Some(instant.with_timezone(&Local).date_naive());
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|date_time| date_time.date())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}

#[must_use]
pub fn is_valid_date(text: &str) -> bool {
    parse_date(text).is_ok()
}

/// Formats a date as `YYYY-MM-DD`, the left inverse of [`parse_date`].
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[must_use]
pub fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format(DATE_TIME_FORMAT).to_string()
}

/// Shifts a date by a signed number of days.
///
/// # Errors
///
/// Returns [`DateError::OutOfRange`] if the result is not representable.
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, DateError> {
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    };

    shifted.ok_or_else(|| DateError::OutOfRange(format!("{date} {days:+} days")))
}

/// # Errors
///
/// Returns [`DateError::OutOfRange`] if the result is not representable.
pub fn subtract_days(date: NaiveDate, days: i64) -> Result<NaiveDate, DateError> {
    let negated = days
        .checked_neg()
        .ok_or_else(|| DateError::OutOfRange(format!("{date} -{days} days")))?;
    add_days(date, negated)
}

/// Shifts a date by a signed number of months, clamping to the last day of
/// the target month (`2024-01-31` + 1 month is `2024-02-29`).
///
/// # Errors
///
/// Returns [`DateError::OutOfRange`] if the result is not representable.
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, DateError> {
    let step = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(step)
    } else {
        date.checked_sub_months(step)
    };

    shifted.ok_or_else(|| DateError::OutOfRange(format!("{date} {months:+} months")))
}

/// Compares two values by local calendar day only.
pub fn is_same_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Inclusive on both ends.
pub fn is_within_range<T: PartialOrd>(value: T, start: T, end: T) -> bool {
    start <= value && value <= end
}

/// Absolute number of whole days between two dates.
#[must_use]
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days().abs()
}

#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| start_of_day(date))
}

#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// # Errors
///
/// Returns [`DateError::OutOfRange`] for the final month chrono can represent.
pub fn month_end(date: NaiveDate) -> Result<NaiveDate, DateError> {
    days_in_month(date.year(), date.month())
        .and_then(|last| date.with_day(last))
        .ok_or_else(|| DateError::OutOfRange(format!("end of month for {date}")))
}

/// ISO 8601 week number (weeks start on Monday, week 1 holds the first Thursday).
#[must_use]
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// The current local calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
