use regex::Regex;
use std::sync::OnceLock;

/// Optional hints pulled out of a source link. Every field is best effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceHints {
    pub title: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl SourceHints {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

/// Extracts title slug, season and episode from an aniworld-style stream link:
/// `aniworld.to/anime/stream/{slug}[/staffel-{season}][/episode-{episode}]`.
///
/// Scheme and `www.` are optional. Unknown links yield empty hints.
#[must_use]
pub fn parse_source_url(url: &str) -> SourceHints {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    static STREAM: OnceLock<Regex> = OnceLock::new();

    let prefix = get_regex(&PREFIX, r"^(?i)(?:https?://)?(?:www\.)?");
    let stream = get_regex(
        &STREAM,
        r"(?i)aniworld\.to/anime/stream/(?P<title>[^/]+)(?:/staffel-(?P<season>\d+))?(?:/episode-(?P<episode>\d+))?",
    );

    let cleaned = prefix.replace(url.trim(), "");
    let Some(caps) = stream.captures(&cleaned) else {
        return SourceHints::default();
    };

    SourceHints {
        title: caps.name("title").map(|m| m.as_str().to_string()),
        season: positive_number(caps.name("season")),
        episode: positive_number(caps.name("episode")),
    }
}

/// Points an aniworld stream link at one episode, replacing an existing
/// `/episode-N` segment or appending one (with `/staffel-{season}` when the
/// link has no season). Other links come back unchanged.
#[must_use]
pub fn episode_link(url: &str, season: u32, episode: u32) -> String {
    static SERIES_LINK: OnceLock<Regex> = OnceLock::new();

    let series_link = get_regex(
        &SERIES_LINK,
        r"(?i)^(?P<base>(?:https?://)?(?:www\.)?aniworld\.to/anime/stream/[^/?#]+)(?:/(?P<staffel>staffel-\d+))?(?:/episode-\d+)?/?$",
    );

    let trimmed = url.trim();
    let Some(caps) = series_link.captures(trimmed) else {
        return url.to_string();
    };

    let base = &caps["base"];
    match caps.name("staffel") {
        Some(staffel) => format!("{base}/{}/episode-{episode}", staffel.as_str()),
        None => format!("{base}/staffel-{season}/episode-{episode}"),
    }
}

fn positive_number(m: Option<regex::Match<'_>>) -> Option<u32> {
    m.and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

/// Turns a URL slug such as `one-piece` into `One Piece`.
#[must_use]
pub fn humanize_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
