//! Durable record of the series list and the watched set.
//!
//! The calendar core never touches storage; callers load, recompute and
//! save through a [`SeriesStore`]. Writes are last-write-wins.

pub mod json_store;
pub mod memory_store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::calendar::WatchedSet;
use crate::constants::storage::SCHEMA_VERSION;
use crate::domain::EventId;
use crate::models::Series;
use crate::validation::RejectedEntry;

pub use json_store::JsonStore;
pub use memory_store::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Everything read from the store at startup.
#[derive(Debug, Clone, Default)]
pub struct LoadedState {
    pub series: Vec<Series>,
    pub watched: WatchedSet,
    /// Persisted records that failed validation and were left out of `series`.
    pub rejected: Vec<RejectedEntry>,
}

#[async_trait::async_trait]
pub trait SeriesStore: Send + Sync {
    /// Reads the series list and the watched set.
    ///
    /// # Errors
    ///
    /// - Returns [`StoreError::Io`] if the backing storage cannot be read
    /// - Returns [`StoreError::Format`] if the stored document is not valid
    async fn load(&self) -> Result<LoadedState, StoreError>;

    /// Replaces the stored series list, leaving the watched set untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document cannot be read or written.
    async fn save_series(&self, series: &[Series]) -> Result<(), StoreError>;

    /// Marks an event as watched, or removes the mark.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document cannot be read or written.
    async fn set_watched(&self, id: &EventId, watched: bool) -> Result<(), StoreError>;

    /// Drops every series and every watched mark.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document cannot be written.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// On-disk layout. Series are kept as raw JSON so that loading can report
/// malformed entries instead of failing the whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StorageDocument {
    pub version: String,

    /// Older data files keep this list under `animes`.
    #[serde(default, alias = "animes")]
    pub series: Vec<serde_json::Value>,

    #[serde(default)]
    pub watched_events: WatchedSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for StorageDocument {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            series: Vec::new(),
            watched_events: WatchedSet::default(),
            last_updated: None,
        }
    }
}

impl StorageDocument {
    pub(crate) fn set_series(&mut self, series: &[Series]) -> Result<(), serde_json::Error> {
        self.series = series
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    pub(crate) fn touch(&mut self) {
        self.version = SCHEMA_VERSION.to_string();
        self.last_updated = Some(Utc::now());
    }
}
