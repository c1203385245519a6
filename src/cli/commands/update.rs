//! Update series command handler

use chrono::NaiveDate;

use crate::config::Config;
use crate::models::SeriesPatch;
use crate::services::SeriesService;

#[derive(Debug, Default)]
pub struct UpdateArgs {
    pub title: Option<String>,
    pub clear_title: bool,
    pub source_url: Option<String>,
    pub season: Option<u32>,
    pub episode_start: Option<u32>,
    pub max_episodes: Option<u32>,
    pub unbounded: bool,
    pub interval: Option<u32>,
    pub start_date: Option<NaiveDate>,
}

impl UpdateArgs {
    fn into_patch(self) -> SeriesPatch {
        SeriesPatch {
            title: if self.clear_title {
                Some(None)
            } else {
                self.title.map(Some)
            },
            source_url: self.source_url,
            season: self.season,
            episode_start: self.episode_start,
            max_episodes: if self.unbounded {
                Some(None)
            } else {
                self.max_episodes.map(Some)
            },
            release_interval: self.interval,
            start_date: self.start_date,
        }
    }
}

pub async fn cmd_update_series(config: &Config, id: &str, args: UpdateArgs) -> anyhow::Result<()> {
    let patch = args.into_patch();
    if patch.is_empty() {
        println!("Nothing to update. See: kalendarr update --help");
        return Ok(());
    }

    let service = super::open_service(config);
    let series = service.get(id).await?;
    let updated = service.update(&series.id, patch).await?;

    println!("✓ Updated {} ({})", updated.display_title(), updated.id);
    Ok(())
}
