//! Store-backed implementation of the [`SeriesService`] trait.
//!
//! Every call reads the full state, recomputes what it needs and writes the
//! result back; nothing is cached between calls.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

use crate::calendar::{MonthView, WindowDefaults, YearMonth, get_all_events, month_days};
use crate::db::SeriesStore;
use crate::domain::{EventId, SeriesId};
use crate::models::{Event, NewSeries, Series, SeriesPatch};
use crate::services::series_service::{SeriesError, SeriesService};
use crate::validation::{validate_new_series, validate_series};

pub struct StoreSeriesService {
    store: Arc<dyn SeriesStore>,
    window: WindowDefaults,
}

impl StoreSeriesService {
    #[must_use]
    pub fn new(store: Arc<dyn SeriesStore>, window: WindowDefaults) -> Self {
        Self { store, window }
    }

    fn resolve<'a>(series: &'a [Series], id: &str) -> Result<&'a Series, SeriesError> {
        if let Some(exact) = series.iter().find(|s| s.id.as_str() == id) {
            return Ok(exact);
        }

        let mut matches = series.iter().filter(|s| s.id.as_str().starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(found), None) if !id.is_empty() => Ok(found),
            (Some(_), _) => Err(SeriesError::Ambiguous(id.to_string())),
            (None, _) => Err(SeriesError::NotFound(SeriesId::new(id))),
        }
    }

    fn position(series: &[Series], id: &SeriesId) -> Result<usize, SeriesError> {
        series
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| SeriesError::NotFound(id.clone()))
    }
}

#[async_trait::async_trait]
impl SeriesService for StoreSeriesService {
    async fn list(&self) -> Result<Vec<Series>, SeriesError> {
        Ok(self.store.load().await?.series)
    }

    async fn get(&self, id: &str) -> Result<Series, SeriesError> {
        let series = self.store.load().await?.series;
        Self::resolve(&series, id).cloned()
    }

    async fn add(&self, input: NewSeries) -> Result<Series, SeriesError> {
        validate_new_series(&input)?;

        let mut series = self.store.load().await?.series;
        let created = Series::create(input);
        series.push(created.clone());
        self.store.save_series(&series).await?;

        info!(
            series_id = %created.id,
            title = created.display_title(),
            "Added series"
        );
        Ok(created)
    }

    async fn update(&self, id: &SeriesId, patch: SeriesPatch) -> Result<Series, SeriesError> {
        let mut series = self.store.load().await?.series;
        let index = Self::position(&series, id)?;

        let mut updated = series[index].clone();
        updated.apply(patch);
        validate_series(&updated)?;

        series[index] = updated.clone();
        self.store.save_series(&series).await?;

        info!(series_id = %id, "Updated series");
        Ok(updated)
    }

    async fn delete(&self, id: &SeriesId) -> Result<Series, SeriesError> {
        let mut series = self.store.load().await?.series;
        let index = Self::position(&series, id)?;
        let removed = series.remove(index);
        self.store.save_series(&series).await?;

        info!(series_id = %id, title = removed.display_title(), "Deleted series");
        Ok(removed)
    }

    async fn set_watched(&self, event_id: &EventId, watched: bool) -> Result<(), SeriesError> {
        self.store.set_watched(event_id, watched).await?;
        debug!(event_id = %event_id, watched, "Updated watched status");
        Ok(())
    }

    async fn events(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Vec<Event>, SeriesError> {
        let state = self.store.load().await?;
        let events = get_all_events(&state.series, start, end, &self.window, today);
        Ok(state.watched.apply(events))
    }

    async fn month_view(
        &self,
        month: YearMonth,
        today: NaiveDate,
    ) -> Result<MonthView, SeriesError> {
        let grid = month_days(month);
        let first = grid.first().copied();
        let last = grid.last().copied();

        let events = self.events(first, last, today).await?;
        Ok(MonthView::build(month, &events, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::validation::ValidationError;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(title: &str) -> NewSeries {
        NewSeries {
            title: Some(title.to_string()),
            source_url: "https://aniworld.to/anime/stream/test".to_string(),
            season: 1,
            episode_start: 1,
            max_episodes: None,
            release_interval: 7,
            start_date: ymd(2024, 1, 1),
        }
    }

    fn service() -> StoreSeriesService {
        StoreSeriesService::new(Arc::new(MemoryStore::new()), WindowDefaults::default())
    }

    #[tokio::test]
    async fn test_add_list_and_get() {
        let service = service();
        let added = service.add(input("Alpha")).await.unwrap();

        let all = service.list().await.unwrap();
        assert_eq!(all, vec![added.clone()]);

        let prefix = &added.id.as_str()[..8];
        assert_eq!(service.get(prefix).await.unwrap(), added);
        assert!(matches!(
            service.get("does-not-exist").await,
            Err(SeriesError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input() {
        let service = service();
        let mut bad = input("Alpha");
        bad.release_interval = 0;

        let err = service.add(bad).await.unwrap_err();
        assert!(matches!(
            err,
            SeriesError::Validation(ref reasons)
                if reasons == &vec![ValidationError::NotPositive("releaseInterval")]
        ));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = service();
        let added = service.add(input("Alpha")).await.unwrap();

        let updated = service
            .update(
                &added.id,
                SeriesPatch {
                    max_episodes: Some(Some(2)),
                    ..SeriesPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.max_episodes, Some(2));

        let invalid = service
            .update(
                &added.id,
                SeriesPatch {
                    season: Some(0),
                    ..SeriesPatch::default()
                },
            )
            .await;
        assert!(matches!(invalid, Err(SeriesError::Validation(_))));

        let removed = service.delete(&added.id).await.unwrap();
        assert_eq!(removed.id, added.id);
        assert!(matches!(
            service.delete(&added.id).await,
            Err(SeriesError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_events_carry_watched_flags() {
        let service = service();
        service.add(input("Alpha")).await.unwrap();

        let today = ymd(2024, 1, 20);
        let events = service
            .events(Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 31)), today)
            .await
            .unwrap();
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.watched == Some(false)));

        service.set_watched(&events[1].id, true).await.unwrap();
        let events = service
            .events(Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 31)), today)
            .await
            .unwrap();
        assert_eq!(events[1].watched, Some(true));
        assert_eq!(events.iter().filter(|e| e.is_watched()).count(), 1);
    }

    #[tokio::test]
    async fn test_month_view_covers_padding_days() {
        let service = service();
        service.add(input("Alpha")).await.unwrap();

        let view = service
            .month_view(YearMonth::new(2024, 2).unwrap(), ymd(2024, 2, 5))
            .await
            .unwrap();

        // Grid runs 2024-01-29 ..= 2024-03-10; releases are every Monday.
        let with_events: Vec<String> = view
            .cells
            .iter()
            .filter(|c| !c.events.is_empty())
            .map(|c| crate::dates::format_date(c.date))
            .collect();
        assert_eq!(
            with_events,
            vec![
                "2024-01-29",
                "2024-02-05",
                "2024-02-12",
                "2024-02-19",
                "2024-02-26",
                "2024-03-04"
            ]
        );
        assert_eq!(view.cells[0].events[0].episode_number, 5);
        assert!(view.cells[7].is_today);
    }
}
