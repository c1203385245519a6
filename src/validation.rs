//! Validation of user input and of persisted series records.
//!
//! Loading never silently discards a record: every rejected entry is
//! reported together with all of the reasons it failed.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::dates::parse_date;
use crate::domain::SeriesId;
use crate::models::{NewSeries, Series};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Entry is not an object")]
    NotAnObject,

    #[error("Missing or empty field: {0}")]
    MissingField(&'static str),

    #[error("Field {0} has the wrong type")]
    WrongType(&'static str),

    #[error("{0} must be a positive integer")]
    NotPositive(&'static str),

    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid start date: {0}")]
    InvalidDate(String),
}

/// Accepts absolute `http`/`https` URLs only.
#[must_use]
pub fn is_valid_url(text: &str) -> bool {
    url::Url::parse(text).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn check_positive(value: u32, field: &'static str, errors: &mut Vec<ValidationError>) {
    if value == 0 {
        errors.push(ValidationError::NotPositive(field));
    }
}

/// Validates input for a new series, collecting every problem.
///
/// # Errors
///
/// Returns all [`ValidationError`]s found; the list is never empty.
pub fn validate_new_series(input: &NewSeries) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_valid_url(&input.source_url) {
        errors.push(ValidationError::InvalidUrl(input.source_url.clone()));
    }
    check_positive(input.season, "season", &mut errors);
    check_positive(input.episode_start, "episodeStart", &mut errors);
    check_positive(input.release_interval, "releaseInterval", &mut errors);
    if let Some(cap) = input.max_episodes {
        check_positive(cap, "maxEpisodes", &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an existing series, e.g. after a patch was applied.
///
/// # Errors
///
/// Returns all [`ValidationError`]s found; the list is never empty.
pub fn validate_series(series: &Series) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if series.id.is_empty() {
        errors.push(ValidationError::MissingField("id"));
    }

    let as_input = NewSeries {
        title: series.title.clone(),
        source_url: series.source_url.clone(),
        season: series.season,
        episode_start: series.episode_start,
        max_episodes: series.max_episodes,
        release_interval: series.release_interval,
        start_date: series.start_date,
    };
    if let Err(mut field_errors) = validate_new_series(&as_input) {
        errors.append(&mut field_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A persisted record that could not be turned into a [`Series`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub index: usize,
    pub id: Option<String>,
    pub reasons: Vec<ValidationError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub accepted: Vec<Series>,
    pub rejected: Vec<RejectedEntry>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parses raw persisted records, keeping the valid ones and reporting the rest.
#[must_use]
pub fn validate_series_records(records: &[Value]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (index, record) in records.iter().enumerate() {
        match parse_series_record(record) {
            Ok(series) => report.accepted.push(series),
            Err(reasons) => report.rejected.push(RejectedEntry {
                index,
                id: record
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                reasons,
            }),
        }
    }

    report
}

/// Parses one persisted record.
///
/// # Errors
///
/// Returns every [`ValidationError`] found in the record.
pub fn parse_series_record(record: &Value) -> Result<Series, Vec<ValidationError>> {
    let Some(fields) = record.as_object() else {
        return Err(vec![ValidationError::NotAnObject]);
    };
    let mut errors = Vec::new();

    let id = required_string(fields.get("id"), "id", &mut errors);
    let source_url = required_string(fields.get("sourceUrl"), "sourceUrl", &mut errors)
        .filter(|url| {
            let valid = is_valid_url(url);
            if !valid {
                errors.push(ValidationError::InvalidUrl(url.clone()));
            }
            valid
        });
    let season = required_positive(fields.get("season"), "season", &mut errors);
    let episode_start = required_positive(fields.get("episodeStart"), "episodeStart", &mut errors);
    let release_interval =
        required_positive(fields.get("releaseInterval"), "releaseInterval", &mut errors);
    let start_date = required_date(fields.get("startDate"), &mut errors);

    let title = match fields.get("title") {
        None | Some(Value::Null) => None,
        Some(Value::String(title)) if title.trim().is_empty() => None,
        Some(Value::String(title)) => Some(title.clone()),
        Some(_) => {
            errors.push(ValidationError::WrongType("title"));
            None
        }
    };

    let max_episodes = match fields.get("maxEpisodes") {
        None | Some(Value::Null) => None,
        other => required_positive(other, "maxEpisodes", &mut errors),
    };

    let (
        Some(id),
        Some(source_url),
        Some(season),
        Some(episode_start),
        Some(release_interval),
        Some(start_date),
    ) = (id, source_url, season, episode_start, release_interval, start_date)
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let created_at = fields
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or_else(|| start_date.and_time(NaiveTime::MIN).and_utc());

    Ok(Series {
        id: SeriesId::new(id),
        title,
        source_url,
        season,
        episode_start,
        max_episodes,
        release_interval,
        start_date,
        created_at,
    })
}

fn required_string(
    value: Option<&Value>,
    field: &'static str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(Value::String(_)) | None | Some(Value::Null) => {
            errors.push(ValidationError::MissingField(field));
            None
        }
        Some(_) => {
            errors.push(ValidationError::WrongType(field));
            None
        }
    }
}

fn required_positive(
    value: Option<&Value>,
    field: &'static str,
    errors: &mut Vec<ValidationError>,
) -> Option<u32> {
    match value {
        None | Some(Value::Null) => {
            errors.push(ValidationError::MissingField(field));
            None
        }
        Some(Value::Number(number)) => match number.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) if n > 0 => Some(n),
            _ => {
                errors.push(ValidationError::NotPositive(field));
                None
            }
        },
        Some(_) => {
            errors.push(ValidationError::WrongType(field));
            None
        }
    }
}

fn required_date(value: Option<&Value>, errors: &mut Vec<ValidationError>) -> Option<NaiveDate> {
    match value {
        Some(Value::String(text)) => match parse_date(text) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(ValidationError::InvalidDate(text.clone()));
                None
            }
        },
        None | Some(Value::Null) => {
            errors.push(ValidationError::MissingField("startDate"));
            None
        }
        Some(_) => {
            errors.push(ValidationError::WrongType("startDate"));
            None
        }
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|instant| instant.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            parse_date(text)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> NewSeries {
        NewSeries {
            title: None,
            source_url: "https://aniworld.to/anime/stream/one-piece".to_string(),
            season: 1,
            episode_start: 1,
            max_episodes: None,
            release_interval: 7,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn record() -> Value {
        json!({
            "id": "s1",
            "title": "One Piece",
            "sourceUrl": "https://aniworld.to/anime/stream/one-piece",
            "season": 1,
            "episodeStart": 1,
            "maxEpisodes": 12,
            "releaseInterval": 7,
            "startDate": "2024-01-01",
            "createdAt": "2024-01-01T10:00:00.000Z"
        })
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://aniworld.to/anime/stream/x"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("aniworld.to/anime"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_validate_new_series_collects_all_errors() {
        assert!(validate_new_series(&input()).is_ok());

        let mut bad = input();
        bad.source_url = "not a url".to_string();
        bad.season = 0;
        bad.release_interval = 0;
        bad.max_episodes = Some(0);

        let errors = validate_new_series(&bad).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidUrl("not a url".to_string()),
                ValidationError::NotPositive("season"),
                ValidationError::NotPositive("releaseInterval"),
                ValidationError::NotPositive("maxEpisodes"),
            ]
        );
    }

    #[test]
    fn test_validate_series_requires_id() {
        let mut series = Series::create(input());
        assert!(validate_series(&series).is_ok());

        series.id = SeriesId::default();
        assert_eq!(
            validate_series(&series).unwrap_err(),
            vec![ValidationError::MissingField("id")]
        );
    }

    #[test]
    fn test_parse_valid_record() {
        let series = parse_series_record(&record()).unwrap();
        assert_eq!(series.id.as_str(), "s1");
        assert_eq!(series.title.as_deref(), Some("One Piece"));
        assert_eq!(series.max_episodes, Some(12));
        assert_eq!(series.created_at.to_rfc3339(), "2024-01-01T10:00:00+00:00");
    }

    #[test]
    fn test_parse_record_optional_fields() {
        let mut minimal = record();
        let fields = minimal.as_object_mut().unwrap();
        fields.remove("title");
        fields.insert("maxEpisodes".to_string(), Value::Null);
        fields.remove("createdAt");

        let series = parse_series_record(&minimal).unwrap();
        assert_eq!(series.title, None);
        assert_eq!(series.max_episodes, None);
        assert_eq!(series.created_at.date_naive(), series.start_date);
    }

    #[test]
    fn test_parse_record_reports_every_reason() {
        let broken = json!({
            "id": "",
            "sourceUrl": 5,
            "season": 0,
            "episodeStart": 1.5,
            "releaseInterval": -7,
            "startDate": "someday"
        });

        let reasons = parse_series_record(&broken).unwrap_err();
        assert_eq!(
            reasons,
            vec![
                ValidationError::MissingField("id"),
                ValidationError::WrongType("sourceUrl"),
                ValidationError::NotPositive("season"),
                ValidationError::NotPositive("episodeStart"),
                ValidationError::NotPositive("releaseInterval"),
                ValidationError::InvalidDate("someday".to_string()),
            ]
        );
    }

    #[test]
    fn test_report_splits_accepted_and_rejected() {
        let mut wrong_cap = record();
        wrong_cap["id"] = json!("s2");
        wrong_cap["maxEpisodes"] = json!("twelve");

        let records = vec![record(), json!("garbage"), wrong_cap];
        let report = validate_series_records(&records);

        assert_eq!(report.accepted.len(), 1);
        assert!(!report.is_clean());
        assert_eq!(
            report.rejected,
            vec![
                RejectedEntry {
                    index: 1,
                    id: None,
                    reasons: vec![ValidationError::NotAnObject],
                },
                RejectedEntry {
                    index: 2,
                    id: Some("s2".to_string()),
                    reasons: vec![ValidationError::WrongType("maxEpisodes")],
                },
            ]
        );
    }
}
