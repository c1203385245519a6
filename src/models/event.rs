use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::format_date;
use crate::domain::{EventId, SeriesId};
use crate::parser::episode_link;

/// One projected episode release. Derived from a [`super::Series`], never
/// persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,

    pub series_id: SeriesId,

    #[serde(with = "super::calendar_date")]
    pub date: NaiveDate,

    pub episode_number: u32,

    pub season: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Filled in by the watched overlay only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched: Option<bool>,
}

impl Event {
    /// Canonical `YYYY-MM-DD` key used for sorting and day buckets.
    #[must_use]
    pub fn date_key(&self) -> String {
        format_date(self.date)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(self.series_id.as_str())
    }

    /// `S01E05` style code.
    #[must_use]
    pub fn episode_code(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.episode_number)
    }

    #[must_use]
    pub fn is_watched(&self) -> bool {
        self.watched.unwrap_or(false)
    }

    /// Link to this release's own episode page, when a source is known.
    #[must_use]
    pub fn episode_url(&self) -> Option<String> {
        self.source_url
            .as_deref()
            .map(|url| episode_link(url, self.season, self.episode_number))
    }
}
