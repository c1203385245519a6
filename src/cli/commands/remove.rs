//! Remove series command handler

use crate::config::Config;
use crate::services::SeriesService;

pub async fn cmd_remove_series(config: &Config, id: &str) -> anyhow::Result<()> {
    let service = super::open_service(config);
    let series = service.get(id).await?;
    let removed = service.delete(&series.id).await?;

    println!("✓ Removed {} ({})", removed.display_title(), removed.id);
    Ok(())
}
