/// Canonical display and storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub mod calendar {

    pub const GRID_CELLS: usize = 42;

    pub const DAYS_PER_WEEK: usize = 7;

    pub const DEFAULT_MONTHS_BACK: u32 = 6;

    pub const DEFAULT_MONTHS_FORWARD: u32 = 3;
}

pub mod series {

    pub const DEFAULT_SEASON: u32 = 1;

    pub const DEFAULT_EPISODE_START: u32 = 1;

    pub const DEFAULT_RELEASE_INTERVAL_DAYS: u32 = 7;
}

pub mod storage {

    pub const SCHEMA_VERSION: &str = "1.0.0";

    pub const DEFAULT_DATA_PATH: &str = "data/kalendarr.json";
}
