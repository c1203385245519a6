//! Add series command handler

use chrono::NaiveDate;

use crate::config::Config;
use crate::dates::{format_date, today};
use crate::models::NewSeries;
use crate::parser::{humanize_slug, parse_source_url};
use crate::services::SeriesService;

#[allow(clippy::too_many_arguments)]
pub async fn cmd_add_series(
    config: &Config,
    source_url: String,
    title: Option<String>,
    season: Option<u32>,
    episode_start: Option<u32>,
    max_episodes: Option<u32>,
    interval: Option<u32>,
    start_date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let hints = parse_source_url(&source_url);
    let defaults = &config.defaults;

    let input = NewSeries {
        title: title.or_else(|| hints.title.as_deref().map(humanize_slug)),
        season: season.or(hints.season).unwrap_or(defaults.season),
        episode_start: episode_start
            .or(hints.episode)
            .unwrap_or(defaults.episode_start),
        max_episodes,
        release_interval: interval.unwrap_or(defaults.release_interval_days),
        start_date: start_date.unwrap_or_else(today),
        source_url,
    };

    let service = super::open_service(config);
    let series = service.add(input).await?;

    println!("✓ Added {}", series.display_title());
    println!("  ID: {}", series.id);
    println!(
        "  Season {} from episode {} | every {} day(s) starting {}",
        series.season,
        series.episode_start,
        series.release_interval,
        format_date(series.start_date)
    );
    if let Some(cap) = series.max_episodes {
        println!("  Ends after episode {cap}");
    }

    Ok(())
}
