//! List series command handler

use crate::config::Config;
use crate::dates::format_date;
use crate::services::SeriesService;

pub async fn cmd_list_series(config: &Config) -> anyhow::Result<()> {
    let service = super::open_service(config);
    let series_list = service.list().await?;

    if series_list.is_empty() {
        println!("No series tracked yet.");
        println!();
        println!("Add one with: kalendarr add <source url>");
        return Ok(());
    }

    println!("Tracked Series ({} total)", series_list.len());
    println!("{:-<70}", "");

    for series in series_list {
        let episodes = series.max_episodes.map_or_else(
            || format!("{}+", series.episode_start),
            |cap| format!("{}-{}", series.episode_start, cap),
        );

        println!(
            "• {} [S{:02} E{}]",
            series.display_title(),
            series.season,
            episodes
        );
        println!(
            "  ID: {} | Every {} day(s) from {}",
            series.id,
            series.release_interval,
            format_date(series.start_date)
        );
        println!("  Source: {}", series.source_url);
    }

    Ok(())
}
