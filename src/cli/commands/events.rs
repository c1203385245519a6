//! Event list command handler

use chrono::NaiveDate;

use crate::config::Config;
use crate::dates::{format_date, today};
use crate::services::SeriesService;

pub async fn cmd_events(
    config: &Config,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    unwatched_only: bool,
) -> anyhow::Result<()> {
    let service = super::open_service(config);
    let events = service.events(from, to, today()).await?;

    let shown: Vec<_> = events
        .iter()
        .filter(|event| !(unwatched_only && event.is_watched()))
        .collect();

    if shown.is_empty() {
        println!("No releases in this window.");
        return Ok(());
    }

    println!("Releases ({} total)", shown.len());
    println!("{:-<70}", "");

    let mut last_date = None;
    for event in shown {
        if last_date != Some(event.date) {
            println!("{}", format_date(event.date));
            last_date = Some(event.date);
        }
        let mark = if event.is_watched() { "✓" } else { " " };
        println!("  [{}] {} {}", mark, event.label(), event.episode_code());
        println!("      {}", event.id);
        if let Some(url) = event.episode_url() {
            println!("      {url}");
        }
    }

    Ok(())
}
