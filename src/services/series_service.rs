//! Domain service for managing tracked series and their calendar.
//!
//! This module provides the [`SeriesService`] trait. Implementations load the
//! current state from a store, recompute events with the calendar core and
//! write mutations back.

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::{MonthView, YearMonth};
use crate::db::StoreError;
use crate::domain::{EventId, SeriesId};
use crate::models::{Event, NewSeries, Series, SeriesPatch};
use crate::validation::ValidationError;

/// Domain errors for series operations.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("Series {0} not found")]
    NotFound(SeriesId),

    #[error("Series id '{0}' is ambiguous")]
    Ambiguous(String),

    #[error("Validation failed: {}", join_reasons(.0))]
    Validation(Vec<ValidationError>),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

fn join_reasons(reasons: &[ValidationError]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for SeriesError {
    fn from(reasons: Vec<ValidationError>) -> Self {
        Self::Validation(reasons)
    }
}

#[async_trait::async_trait]
pub trait SeriesService: Send + Sync {
    /// Lists every tracked series in stored order.
    ///
    /// # Errors
    ///
    /// - Returns [`SeriesError::Store`] if the store cannot be read
    async fn list(&self) -> Result<Vec<Series>, SeriesError>;

    /// Resolves a full id or a unique id prefix.
    ///
    /// # Errors
    ///
    /// - Returns [`SeriesError::NotFound`] if nothing matches
    /// - Returns [`SeriesError::Ambiguous`] if a prefix matches several series
    /// - Returns [`SeriesError::Store`] if the store cannot be read
    async fn get(&self, id: &str) -> Result<Series, SeriesError>;

    /// Validates and stores a new series.
    ///
    /// # Errors
    ///
    /// - Returns [`SeriesError::Validation`] listing every invalid field
    /// - Returns [`SeriesError::Store`] on storage failures
    async fn add(&self, input: NewSeries) -> Result<Series, SeriesError>;

    /// Applies a partial update to an existing series.
    ///
    /// # Errors
    ///
    /// - Returns [`SeriesError::NotFound`] if the series does not exist
    /// - Returns [`SeriesError::Validation`] if the result is invalid
    /// - Returns [`SeriesError::Store`] on storage failures
    async fn update(&self, id: &SeriesId, patch: SeriesPatch) -> Result<Series, SeriesError>;

    /// Removes a series. Watched marks of its events are kept.
    ///
    /// # Errors
    ///
    /// - Returns [`SeriesError::NotFound`] if the series does not exist
    /// - Returns [`SeriesError::Store`] on storage failures
    async fn delete(&self, id: &SeriesId) -> Result<Series, SeriesError>;

    /// Marks or unmarks an event as watched.
    ///
    /// # Errors
    ///
    /// - Returns [`SeriesError::Store`] on storage failures
    async fn set_watched(&self, event_id: &EventId, watched: bool) -> Result<(), SeriesError>;

    /// All events in the window with watched flags applied. Missing bounds use
    /// the configured defaults relative to `today`.
    ///
    /// # Errors
    ///
    /// - Returns [`SeriesError::Store`] if the store cannot be read
    async fn events(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Vec<Event>, SeriesError>;

    /// Lays out one month with every event visible in its 42-day grid.
    ///
    /// # Errors
    ///
    /// - Returns [`SeriesError::Store`] if the store cannot be read
    async fn month_view(&self, month: YearMonth, today: NaiveDate)
    -> Result<MonthView, SeriesError>;
}
