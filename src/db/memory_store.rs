use tokio::sync::RwLock;

use super::{LoadedState, SeriesStore, StoreError};
use crate::calendar::WatchedSet;
use crate::domain::EventId;
use crate::models::Series;

/// In-process store, used by tests and for dry runs.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<(Vec<Series>, WatchedSet)>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_series(series: Vec<Series>) -> Self {
        Self {
            state: RwLock::new((series, WatchedSet::default())),
        }
    }
}

#[async_trait::async_trait]
impl SeriesStore for MemoryStore {
    async fn load(&self) -> Result<LoadedState, StoreError> {
        let (series, watched) = self.state.read().await.clone();
        Ok(LoadedState {
            series,
            watched,
            rejected: Vec::new(),
        })
    }

    async fn save_series(&self, series: &[Series]) -> Result<(), StoreError> {
        self.state.write().await.0 = series.to_vec();
        Ok(())
    }

    async fn set_watched(&self, id: &EventId, watched: bool) -> Result<(), StoreError> {
        self.state.write().await.1.set_watched(id, watched);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.state.write().await = (Vec::new(), WatchedSet::default());
        Ok(())
    }
}
