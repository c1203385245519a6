//! Recurring release scheduler.
//!
//! Turns a series' cadence into the ordered releases that fall inside a date
//! window. Everything here is a pure function of its inputs.

use chrono::NaiveDate;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::calendar::{DEFAULT_MONTHS_BACK, DEFAULT_MONTHS_FORWARD};
use crate::dates::{self, DateError, add_days, add_months};
use crate::domain::EventId;
use crate::models::{Event, Series};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Release interval must be at least one day")]
    ZeroInterval,

    #[error("Episode number {0} exceeds the supported range")]
    EpisodeOverflow(u64),

    #[error(transparent)]
    Date(#[from] DateError),
}

/// Inclusive range of dates to generate events for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl EventWindow {
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        dates::is_within_range(date, self.start, self.end)
    }
}

/// How far the aggregate view reaches when the caller gives no bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDefaults {
    pub months_back: u32,
    pub months_forward: u32,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            months_back: DEFAULT_MONTHS_BACK,
            months_forward: DEFAULT_MONTHS_FORWARD,
        }
    }
}

impl WindowDefaults {
    /// Fills in missing window bounds.
    ///
    /// The end defaults to `months_forward` after `today`. The start defaults
    /// to the earliest series start (never later than `today`), but no further
    /// back than `months_back` before `today`. Without any series it is `today`.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::OutOfRange`] if a default bound is not representable.
    pub fn resolve(
        &self,
        series: &[Series],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<EventWindow, DateError> {
        let end = match end {
            Some(end) => end,
            None => add_months(today, months_as_offset(self.months_forward))?,
        };

        let start = match start {
            Some(start) => start,
            None if series.is_empty() => today,
            None => {
                let earliest = series
                    .iter()
                    .map(|s| s.start_date)
                    .fold(today, NaiveDate::min);
                let floor = add_months(today, -months_as_offset(self.months_back))?;
                earliest.max(floor)
            }
        };

        Ok(EventWindow::new(start, end))
    }
}

fn months_as_offset(months: u32) -> i32 {
    i32::try_from(months).unwrap_or(i32::MAX)
}

/// Generates the releases of one series inside `window`, oldest first.
///
/// `max_events` caps how many events this call emits. A series that cannot be
/// scheduled (zero interval, arithmetic out of range) contributes no events;
/// the failure is logged rather than propagated.
#[must_use]
pub fn generate_events(series: &Series, window: EventWindow, max_events: Option<usize>) -> Vec<Event> {
    match try_generate_events(series, window, max_events) {
        Ok(events) => events,
        Err(e) => {
            warn!(
                series_id = %series.id,
                error = %e,
                "Failed to generate events for series"
            );
            Vec::new()
        }
    }
}

/// Fallible core of [`generate_events`].
///
/// # Errors
///
/// - Returns [`ScheduleError::ZeroInterval`] for a zero release interval
/// - Returns [`ScheduleError::Date`] if fast-forwarding leaves the calendar
/// - Returns [`ScheduleError::EpisodeOverflow`] for episode numbers past `u32`
pub fn try_generate_events(
    series: &Series,
    window: EventWindow,
    max_events: Option<usize>,
) -> Result<Vec<Event>, ScheduleError> {
    if series.release_interval == 0 {
        return Err(ScheduleError::ZeroInterval);
    }
    let interval = i64::from(series.release_interval);

    let mut date = series.start_date;
    let mut episode = u64::from(series.episode_start);

    // Jump straight to the first release on or after the window start.
    if date < window.start {
        let days_passed = window.start.signed_duration_since(date).num_days();
        let episodes_passed = days_passed / interval;

        date = add_days(date, episodes_passed * interval)?;
        episode += episodes_passed.unsigned_abs();

        if date < window.start {
            date = add_days(date, interval)?;
            episode += 1;
        }
    }

    let mut events = Vec::new();

    while date <= window.end {
        if max_events.is_some_and(|cap| events.len() >= cap) {
            break;
        }
        if series
            .max_episodes
            .is_some_and(|cap| episode > u64::from(cap))
        {
            break;
        }

        let episode_number =
            u32::try_from(episode).map_err(|_| ScheduleError::EpisodeOverflow(episode))?;

        events.push(Event {
            id: EventId::for_release(&series.id, episode_number, date),
            series_id: series.id.clone(),
            date,
            episode_number,
            season: series.season,
            title: series.title.clone(),
            source_url: Some(series.source_url.clone()),
            watched: None,
        });

        episode += 1;
        date = match add_days(date, interval) {
            Ok(next) => next,
            Err(_) => break,
        };
    }

    Ok(events)
}

/// Generates events for every series and sorts them by date, then by title
/// (falling back to the series id).
///
/// Missing bounds are filled by [`WindowDefaults::resolve`] relative to `today`.
#[must_use]
pub fn get_all_events(
    series: &[Series],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    defaults: &WindowDefaults,
    today: NaiveDate,
) -> Vec<Event> {
    let window = match defaults.resolve(series, start, end, today) {
        Ok(window) => window,
        Err(e) => {
            warn!(error = %e, "Failed to resolve calendar window");
            return Vec::new();
        }
    };

    let mut events: Vec<Event> = series
        .iter()
        .flat_map(|s| generate_events(s, window, None))
        .collect();

    // `YYYY-MM-DD` sorts lexicographically in date order, so comparing the
    // dates directly matches comparing their canonical strings.
    events.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| compare_labels(a.label(), b.label()))
    });

    debug!(
        series = series.len(),
        events = events.len(),
        window_start = %window.start,
        window_end = %window.end,
        "Generated calendar events"
    );

    events
}

/// Case-insensitive first, so `alpha` sorts before `Beta`; the raw label
/// breaks ties between labels differing only in case.
fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// [`get_all_events`] relative to the local clock.
#[must_use]
pub fn get_all_events_now(
    series: &[Series],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    defaults: &WindowDefaults,
) -> Vec<Event> {
    get_all_events(series, start, end, defaults, dates::today())
}

/// Events whose date lies in `[start, end]`.
#[must_use]
pub fn events_in_range(events: &[Event], start: NaiveDate, end: NaiveDate) -> Vec<Event> {
    events
        .iter()
        .filter(|event| dates::is_within_range(event.date, start, end))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesId;
    use crate::models::NewSeries;
    use chrono::Utc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly(id: &str, start: NaiveDate) -> Series {
        Series::with_identity(
            NewSeries {
                title: None,
                source_url: format!("https://aniworld.to/anime/stream/{id}"),
                season: 1,
                episode_start: 1,
                max_episodes: None,
                release_interval: 7,
                start_date: start,
            },
            SeriesId::new(id),
            Utc::now(),
        )
    }

    fn window(start: NaiveDate, end: NaiveDate) -> EventWindow {
        EventWindow::new(start, end)
    }

    fn dates_of(events: &[Event]) -> Vec<String> {
        events.iter().map(Event::date_key).collect()
    }

    #[test]
    fn test_weekly_series_in_january() {
        let series = weekly("s1", ymd(2024, 1, 1));
        let events = generate_events(&series, window(ymd(2024, 1, 1), ymd(2024, 1, 31)), None);

        assert_eq!(
            dates_of(&events),
            vec!["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22", "2024-01-29"]
        );
        let episodes: Vec<u32> = events.iter().map(|e| e.episode_number).collect();
        assert_eq!(episodes, vec![1, 2, 3, 4, 5]);
        assert_eq!(events[0].id.as_str(), "s1-ep1-2024-01-01");
        assert_eq!(events[0].season, 1);
        assert_eq!(events[0].watched, None);
    }

    #[test]
    fn test_fast_forward_to_first_release_in_window() {
        let series = weekly("s1", ymd(2024, 1, 1));
        let events = generate_events(&series, window(ymd(2024, 1, 10), ymd(2024, 1, 31)), None);

        assert_eq!(events[0].date_key(), "2024-01-15");
        assert_eq!(events[0].episode_number, 3);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_fast_forward_lands_exactly_on_boundary_release() {
        let series = weekly("s1", ymd(2024, 1, 1));
        let events = generate_events(&series, window(ymd(2024, 1, 15), ymd(2024, 1, 15)), None);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].episode_number, 3);
    }

    #[test]
    fn test_uneven_interval_never_skips_or_duplicates() {
        let mut series = weekly("s1", ymd(2024, 1, 1));
        series.release_interval = 5;

        let full = generate_events(&series, window(ymd(2024, 1, 1), ymd(2024, 3, 31)), None);
        for offset in 0..40 {
            let start = add_days(ymd(2024, 1, 1), offset).unwrap();
            let expected: Vec<&Event> = full.iter().filter(|e| e.date >= start).collect();
            let partial = generate_events(&series, window(start, ymd(2024, 3, 31)), None);
            assert_eq!(partial.len(), expected.len(), "start {start}");
            assert_eq!(partial[0], *expected[0], "start {start}");
        }
    }

    #[test]
    fn test_series_cap_limits_total_events() {
        let mut series = weekly("s1", ymd(2024, 1, 1));
        series.max_episodes = Some(3);

        let events = generate_events(&series, window(ymd(2024, 1, 1), ymd(2024, 12, 31)), None);
        assert_eq!(events.len(), 3);
        assert_eq!(events.last().unwrap().episode_number, 3);
    }

    #[test]
    fn test_cap_below_start_episode_yields_nothing() {
        let mut series = weekly("s1", ymd(2024, 1, 1));
        series.episode_start = 5;
        series.max_episodes = Some(4);

        assert!(generate_events(&series, window(ymd(2024, 1, 1), ymd(2024, 12, 31)), None).is_empty());
    }

    #[test]
    fn test_cap_equal_to_start_episode_yields_one() {
        let mut series = weekly("s1", ymd(2024, 1, 1));
        series.episode_start = 4;
        series.max_episodes = Some(4);

        let events = generate_events(&series, window(ymd(2024, 1, 1), ymd(2024, 12, 31)), None);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].episode_number, 4);

        let later = generate_events(&series, window(ymd(2024, 2, 1), ymd(2024, 12, 31)), None);
        assert!(later.is_empty());
    }

    #[test]
    fn test_per_call_cap() {
        let series = weekly("s1", ymd(2024, 1, 1));
        let events = generate_events(&series, window(ymd(2024, 1, 1), ymd(2024, 12, 31)), Some(2));
        assert_eq!(events.len(), 2);

        let none = generate_events(&series, window(ymd(2024, 1, 1), ymd(2024, 12, 31)), Some(0));
        assert!(none.is_empty());
    }

    #[test]
    fn test_zero_interval_degrades_to_empty() {
        let mut series = weekly("s1", ymd(2024, 1, 1));
        series.release_interval = 0;

        let w = window(ymd(2024, 1, 1), ymd(2024, 1, 31));
        assert!(matches!(
            try_generate_events(&series, w, None),
            Err(ScheduleError::ZeroInterval)
        ));
        assert!(generate_events(&series, w, None).is_empty());
    }

    #[test]
    fn test_start_after_window_or_inverted_window() {
        let series = weekly("s1", ymd(2024, 6, 1));
        assert!(generate_events(&series, window(ymd(2024, 1, 1), ymd(2024, 5, 31)), None).is_empty());
        assert!(generate_events(&series, window(ymd(2024, 7, 1), ymd(2024, 6, 1)), None).is_empty());
    }

    #[test]
    fn test_window_containment_and_monotonic_episodes() {
        for interval in 1..=15 {
            let mut series = weekly("s1", ymd(2023, 11, 17));
            series.release_interval = interval;
            series.episode_start = 3;

            let w = window(ymd(2024, 2, 3), ymd(2024, 5, 9));
            let events = generate_events(&series, w, None);
            assert!(!events.is_empty());
            assert!(events.iter().all(|e| w.contains(e.date)));
            for pair in events.windows(2) {
                assert_eq!(pair[1].episode_number, pair[0].episode_number + 1);
                assert_eq!(
                    pair[1].date.signed_duration_since(pair[0].date).num_days(),
                    i64::from(interval)
                );
            }
        }
    }

    #[test]
    fn test_regeneration_is_deterministic() {
        let series = weekly("s1", ymd(2024, 1, 1));
        let w = window(ymd(2024, 1, 1), ymd(2024, 6, 30));
        assert_eq!(generate_events(&series, w, None), generate_events(&series, w, None));
    }

    #[test]
    fn test_all_events_sorted_by_date_then_title() {
        let mut beta = weekly("b", ymd(2024, 1, 1));
        beta.title = Some("Beta".to_string());
        let mut alpha = weekly("a", ymd(2024, 1, 1));
        alpha.title = Some("Alpha".to_string());
        let untitled = weekly("zzz", ymd(2024, 1, 3));

        let events = get_all_events(
            &[beta, untitled, alpha],
            Some(ymd(2024, 1, 1)),
            Some(ymd(2024, 1, 10)),
            &WindowDefaults::default(),
            ymd(2024, 1, 1),
        );

        let labels: Vec<&str> = events.iter().map(Event::label).collect();
        assert_eq!(labels, vec!["Alpha", "Beta", "zzz", "Alpha", "Beta", "zzz"]);
    }

    #[test]
    fn test_same_day_order_ignores_case() {
        let mut beta = weekly("b", ymd(2024, 1, 1));
        beta.title = Some("Beta".to_string());
        let mut lower_alpha = weekly("a", ymd(2024, 1, 1));
        lower_alpha.title = Some("alpha".to_string());
        let mut upper_alpha = weekly("c", ymd(2024, 1, 1));
        upper_alpha.title = Some("Alpha".to_string());

        let day = Some(ymd(2024, 1, 1));
        let events = get_all_events(
            &[beta, lower_alpha, upper_alpha],
            day,
            day,
            &WindowDefaults::default(),
            ymd(2024, 1, 1),
        );

        let labels: Vec<&str> = events.iter().map(Event::label).collect();
        assert_eq!(labels, vec!["Alpha", "alpha", "Beta"]);
    }

    #[test]
    fn test_broken_series_does_not_abort_batch() {
        let mut broken = weekly("broken", ymd(2024, 1, 1));
        broken.release_interval = 0;
        let healthy = weekly("healthy", ymd(2024, 1, 1));

        let events = get_all_events(
            &[broken, healthy],
            Some(ymd(2024, 1, 1)),
            Some(ymd(2024, 1, 31)),
            &WindowDefaults::default(),
            ymd(2024, 1, 1),
        );

        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.series_id.as_str() == "healthy"));
        let episodes: Vec<u32> = events.iter().map(|e| e.episode_number).collect();
        assert_eq!(episodes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_defaults() {
        let today = ymd(2024, 8, 15);
        let defaults = WindowDefaults::default();

        let empty = defaults.resolve(&[], None, None, today).unwrap();
        assert_eq!(empty, window(today, ymd(2024, 11, 15)));

        let recent = [weekly("s1", ymd(2024, 6, 1))];
        let w = defaults.resolve(&recent, None, None, today).unwrap();
        assert_eq!(w.start, ymd(2024, 6, 1));

        let dormant = [weekly("s1", ymd(2019, 1, 1)), weekly("s2", ymd(2024, 6, 1))];
        let w = defaults.resolve(&dormant, None, None, today).unwrap();
        assert_eq!(w.start, ymd(2024, 2, 15));

        let upcoming = [weekly("s1", ymd(2025, 1, 1))];
        let w = defaults.resolve(&upcoming, None, None, today).unwrap();
        assert_eq!(w.start, today);

        let custom = WindowDefaults { months_back: 1, months_forward: 1 };
        let w = custom.resolve(&dormant, None, None, today).unwrap();
        assert_eq!(w, window(ymd(2024, 7, 15), ymd(2024, 9, 15)));

        let explicit = defaults
            .resolve(&dormant, Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 31)), today)
            .unwrap();
        assert_eq!(explicit, window(ymd(2024, 1, 1), ymd(2024, 1, 31)));
    }

    #[test]
    fn test_events_in_range() {
        let series = weekly("s1", ymd(2024, 1, 1));
        let events = generate_events(&series, window(ymd(2024, 1, 1), ymd(2024, 1, 31)), None);
        let mid = events_in_range(&events, ymd(2024, 1, 8), ymd(2024, 1, 22));
        assert_eq!(dates_of(&mid), vec!["2024-01-08", "2024-01-15", "2024-01-22"]);
    }
}
