pub mod source_url;

pub use source_url::{SourceHints, episode_link, humanize_slug, parse_source_url};
