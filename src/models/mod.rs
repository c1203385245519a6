pub mod event;
pub mod series;

pub use event::Event;
pub use series::{NewSeries, Series, SeriesPatch};

/// Serde adapter storing a [`chrono::NaiveDate`] as `YYYY-MM-DD`.
///
/// Deserialization accepts anything [`crate::dates::parse_date`] accepts, so
/// records written with a full timestamp still load.
pub(crate) mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::dates::{format_date, parse_date};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_date(&text).map_err(serde::de::Error::custom)
    }
}
