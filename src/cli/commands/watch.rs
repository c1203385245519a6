//! Watched status command handler

use crate::config::Config;
use crate::domain::EventId;
use crate::services::SeriesService;

pub async fn cmd_set_watched(config: &Config, event_id: &str, watched: bool) -> anyhow::Result<()> {
    let id = EventId::from(event_id);
    if id.parse().is_none() {
        anyhow::bail!("'{event_id}' is not an event ID (expected <series>-ep<N>-<YYYY-MM-DD>)");
    }

    let service = super::open_service(config);
    service.set_watched(&id, watched).await?;

    if watched {
        println!("✓ Marked {id} as watched");
    } else {
        println!("✓ Cleared watched mark for {id}");
    }
    Ok(())
}
