//! The calendar core: release scheduling, month grid layout and the watched
//! overlay. Nothing in here performs I/O.

pub mod grid;
pub mod schedule;
pub mod watched;

pub use grid::{CalendarCell, EventIndex, MonthView, YearMonth, month_days, weekday_names};
pub use schedule::{
    EventWindow, ScheduleError, WindowDefaults, events_in_range, generate_events,
    get_all_events, get_all_events_now,
};
pub use watched::{WatchedSet, apply_watched};
