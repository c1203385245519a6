mod add;
mod calendar;
mod events;
mod list;
mod remove;
mod update;
mod watch;

use std::sync::Arc;

use crate::config::Config;
use crate::db::JsonStore;
use crate::services::StoreSeriesService;

pub use add::cmd_add_series;
pub use calendar::cmd_calendar;
pub use events::cmd_events;
pub use list::cmd_list_series;
pub use remove::cmd_remove_series;
pub use update::{UpdateArgs, cmd_update_series};
pub use watch::cmd_set_watched;

fn open_service(config: &Config) -> StoreSeriesService {
    let store = JsonStore::new(&config.general.data_path);
    StoreSeriesService::new(Arc::new(store), config.calendar.window_defaults())
}
