use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Watch-page style links: `youtube.com/watch?...v=ID...`. The `v` value is
/// taken as-is, whatever its length.
static WATCH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:(?:www\.|m\.)?youtube\.com|(?:www\.)?youtube-nocookie\.com)/watch\?(?:[^#]*&)?v=([A-Za-z0-9_-]+)(?:[&#].*)?$")
        .expect("watch url pattern")
});

/// Path style links: `youtu.be/ID`, `youtube.com/{shorts,embed,live}/ID`.
/// Only 11 character ids are accepted here.
static PATH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:(?:(?:www\.|m\.)?youtube\.com|(?:www\.)?youtube-nocookie\.com)/(?:shorts|embed|live)/|youtu\.be/)([A-Za-z0-9_-]{11})(?:[/?&#].*)?$")
        .expect("path url pattern")
});

/// A YouTube video identifier extracted from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.trim();
        WATCH_URL
            .captures(url)
            .or_else(|| PATH_URL.captures(url))
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
