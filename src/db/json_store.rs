use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{LoadedState, SeriesStore, StorageDocument, StoreError};
use crate::domain::EventId;
use crate::models::Series;
use crate::validation::validate_series_records;

/// Single JSON document on disk holding the series list and watched ids.
pub struct JsonStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn read_document(&self) -> Result<Option<StorageDocument>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Format {
                path: self.path.clone(),
                source,
            })
    }

    async fn write_document(&self, document: &mut StorageDocument) -> Result<(), StoreError> {
        document.touch();
        let content = serde_json::to_string_pretty(document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), "Data file written");
        Ok(())
    }

    async fn modify<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StorageDocument) -> Result<(), StoreError> + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?.unwrap_or_default();
        change(&mut document)?;
        self.write_document(&mut document).await
    }
}

#[async_trait::async_trait]
impl SeriesStore for JsonStore {
    async fn load(&self) -> Result<LoadedState, StoreError> {
        let document = match self.read_document().await? {
            Some(document) => document,
            None => {
                let _guard = self.write_lock.lock().await;
                let mut document = StorageDocument::default();
                self.write_document(&mut document).await?;
                info!(path = %self.path.display(), "Initialized empty data file");
                document
            }
        };

        let report = validate_series_records(&document.series);
        for entry in &report.rejected {
            let reasons: Vec<String> = entry.reasons.iter().map(ToString::to_string).collect();
            warn!(
                index = entry.index,
                id = entry.id.as_deref().unwrap_or("<none>"),
                reasons = %reasons.join("; "),
                "Skipping invalid series record"
            );
        }

        info!(
            series = report.accepted.len(),
            rejected = report.rejected.len(),
            watched = document.watched_events.len(),
            "Loaded data from {}",
            self.path.display()
        );

        Ok(LoadedState {
            series: report.accepted,
            watched: document.watched_events,
            rejected: report.rejected,
        })
    }

    async fn save_series(&self, series: &[Series]) -> Result<(), StoreError> {
        self.modify(|document| {
            document.set_series(series)?;
            Ok(())
        })
        .await
    }

    async fn set_watched(&self, id: &EventId, watched: bool) -> Result<(), StoreError> {
        self.modify(|document| {
            document.watched_events.set_watched(id, watched);
            Ok(())
        })
        .await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = StorageDocument::default();
        self.write_document(&mut document).await?;
        info!(path = %self.path.display(), "Cleared data file");
        Ok(())
    }
}
