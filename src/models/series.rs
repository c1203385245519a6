use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SeriesId;

/// A tracked series and its release cadence.
///
/// `episode_start <= max_episodes` is expected when a cap is set but is not
/// enforced here; the scheduler yields zero events for such a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: SeriesId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub source_url: String,

    pub season: u32,

    pub episode_start: u32,

    /// Absent means the series runs indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_episodes: Option<u32>,

    /// Days between two consecutive releases.
    pub release_interval: u32,

    #[serde(with = "super::calendar_date")]
    pub start_date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl Series {
    /// Builds a series from user input, assigning a fresh id and timestamp.
    #[must_use]
    pub fn create(input: NewSeries) -> Self {
        Self::with_identity(input, SeriesId::generate(), Utc::now())
    }

    #[must_use]
    pub fn with_identity(input: NewSeries, id: SeriesId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            source_url: input.source_url,
            season: input.season,
            episode_start: input.episode_start,
            max_episodes: input.max_episodes,
            release_interval: input.release_interval,
            start_date: input.start_date,
            created_at,
        }
    }

    /// Title when present, otherwise the id. Used for display and as the
    /// secondary sort key of same-day events.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.id.as_str())
    }

    pub fn apply(&mut self, patch: SeriesPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(source_url) = patch.source_url {
            self.source_url = source_url;
        }
        if let Some(season) = patch.season {
            self.season = season;
        }
        if let Some(episode_start) = patch.episode_start {
            self.episode_start = episode_start;
        }
        if let Some(max_episodes) = patch.max_episodes {
            self.max_episodes = max_episodes;
        }
        if let Some(release_interval) = patch.release_interval {
            self.release_interval = release_interval;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
    }
}

/// User input for a new series, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSeries {
    pub title: Option<String>,
    pub source_url: String,
    pub season: u32,
    pub episode_start: u32,
    pub max_episodes: Option<u32>,
    pub release_interval: u32,
    pub start_date: NaiveDate,
}

/// Partial update. Outer `None` keeps the current value; for the optional
/// fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesPatch {
    pub title: Option<Option<String>>,
    pub source_url: Option<String>,
    pub season: Option<u32>,
    pub episode_start: Option<u32>,
    pub max_episodes: Option<Option<u32>>,
    pub release_interval: Option<u32>,
    pub start_date: Option<NaiveDate>,
}

impl SeriesPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
