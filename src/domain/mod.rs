//! Domain identifiers for tracked series and their projected releases.
//!
//! Both identifiers are newtypes over `String` so a series id can never be
//! passed where an event id is expected (and vice versa).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dates::{format_date, parse_date};

/// Opaque, stable identifier of a tracked series.
///
/// # Examples
///
/// ```rust
/// use kalendarr::domain::SeriesId;
///
/// let id = SeriesId::new("frieren");
/// assert_eq!(id.as_str(), "frieren");
/// assert_eq!(id.to_string(), "frieren");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier (UUID v4).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SeriesId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

const EPISODE_MARKER: &str = "-ep";

/// Length of the `-YYYY-MM-DD` suffix every event id ends with.
const DATE_SUFFIX_LEN: usize = 11;

/// Deterministic identifier of one projected release.
///
/// The layout is `{series}-ep{episode}-{YYYY-MM-DD}`. The date suffix has a
/// fixed width and the episode is all digits, so the last `-ep` marker splits
/// the id unambiguously even when the series id itself contains `-ep`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    #[must_use]
    pub fn for_release(series_id: &SeriesId, episode: u32, date: NaiveDate) -> Self {
        Self(format!(
            "{series_id}{EPISODE_MARKER}{episode}-{}",
            format_date(date)
        ))
    }

    /// Splits the id back into `(series id, episode, date)`.
    #[must_use]
    pub fn parse(&self) -> Option<(SeriesId, u32, NaiveDate)> {
        let split = self.0.len().checked_sub(DATE_SUFFIX_LEN)?;
        if !self.0.is_char_boundary(split) {
            return None;
        }
        let (head, suffix) = self.0.split_at(split);
        let date = parse_date(suffix.strip_prefix('-')?).ok()?;

        let marker = head.rfind(EPISODE_MARKER)?;
        let digits = &head[marker + EPISODE_MARKER.len()..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let episode = digits.parse().ok()?;

        Some((SeriesId::new(&head[..marker]), episode, date))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
