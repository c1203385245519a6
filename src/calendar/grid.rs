//! Monday-first month grid and per-day event buckets.

use chrono::{Datelike, Duration, Month, NaiveDate, Weekday};
use std::collections::HashMap;
use std::fmt;

use crate::constants::calendar::{DAYS_PER_WEEK, GRID_CELLS};
use crate::dates::{self, DateError, format_date};
use crate::models::Event;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// A displayed month. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// # Errors
    ///
    /// Returns [`DateError::OutOfRange`] unless `month` is 1..=12 and `year`
    /// is 1..=9999, the range expressible as `YYYY-MM-DD`.
    pub fn new(year: i32, month: u32) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::OutOfRange(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(MIN_YEAR, MAX_YEAR),
            month: date.month(),
        }
    }

    #[must_use]
    pub fn current() -> Self {
        Self::of(dates::today())
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Previous month, wrapping January back to December of the prior year.
    #[must_use]
    pub fn previous(&self) -> Self {
        match (self.year, self.month) {
            (MIN_YEAR, 1) => *self,
            (year, 1) => Self { year: year - 1, month: 12 },
            (year, month) => Self { year, month: month - 1 },
        }
    }

    /// Next month, wrapping December to January of the following year.
    #[must_use]
    pub fn next(&self) -> Self {
        match (self.year, self.month) {
            (MAX_YEAR, 12) => *self,
            (year, 12) => Self { year: year + 1, month: 1 },
            (year, month) => Self { year, month: month + 1 },
        }
    }

    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        dates::days_in_month(self.year, self.month).unwrap_or(31)
    }

    #[must_use]
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("", |m| m.name())
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

/// Monday-first short weekday names.
#[must_use]
pub fn weekday_names() -> [&'static str; DAYS_PER_WEEK] {
    let mut day = Weekday::Mon;
    std::array::from_fn(|_| {
        let name = short_weekday_name(day);
        day = day.succ();
        name
    })
}

fn short_weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// The 42 dates of a six-week, Monday-first grid for `ym`.
///
/// Leading cells are the trailing days of the previous month, then every day
/// of `ym`, then leading days of the next month until the grid is full.
#[must_use]
pub fn month_days(ym: YearMonth) -> [NaiveDate; GRID_CELLS] {
    let first = ym.first_day();
    let leading = i64::from(first.weekday().num_days_from_monday());
    let grid_start = first - Duration::days(leading);

    let mut next = grid_start;
    std::array::from_fn(|_| {
        let date = next;
        next = date.succ_opt().unwrap_or(date);
        date
    })
}

#[must_use]
pub fn is_current_month(date: NaiveDate, ym: YearMonth) -> bool {
    ym.contains(date)
}

#[must_use]
pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    dates::is_same_day(&date, &today)
}

/// Events grouped by their canonical `YYYY-MM-DD` date key.
#[derive(Debug, Clone, Default)]
pub struct EventIndex {
    by_date: HashMap<String, Vec<Event>>,
}

impl EventIndex {
    /// Buckets every event by date in a single pass, keeping input order
    /// within a day.
    #[must_use]
    pub fn bucket(events: &[Event]) -> Self {
        Self::from_events(events.iter().cloned())
    }

    /// Like [`Self::bucket`] but keeps only events inside `ym`.
    #[must_use]
    pub fn bucket_for_month(events: &[Event], ym: YearMonth) -> Self {
        Self::from_events(events.iter().filter(|e| ym.contains(e.date)).cloned())
    }

    fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut by_date: HashMap<String, Vec<Event>> = HashMap::new();
        for event in events {
            by_date.entry(event.date_key()).or_default().push(event);
        }
        Self { by_date }
    }

    #[must_use]
    pub fn events_for_date(&self, date: NaiveDate) -> &[Event] {
        self.by_date
            .get(&format_date(date))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, date_key: &str) -> Option<&[Event]> {
        self.by_date.get(date_key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn days(&self) -> usize {
        self.by_date.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

/// One day of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub events: Vec<Event>,
    pub is_today: bool,
    pub in_month: bool,
}

/// A fully laid out month: 42 cells, six weeks of seven days.
#[derive(Debug, Clone)]
pub struct MonthView {
    pub month: YearMonth,
    pub cells: Vec<CalendarCell>,
}

impl MonthView {
    #[must_use]
    pub fn build(month: YearMonth, events: &[Event], today: NaiveDate) -> Self {
        let index = EventIndex::bucket(events);
        let cells = month_days(month)
            .into_iter()
            .map(|date| CalendarCell {
                date,
                events: index.events_for_date(date).to_vec(),
                is_today: is_today(date, today),
                in_month: is_current_month(date, month),
            })
            .collect();

        Self { month, cells }
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.in_month)
            .map(|cell| cell.events.len())
            .sum()
    }
}
