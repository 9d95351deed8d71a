//! Link enrichment
//!
//! When a new item's body is a bare YouTube URL, the video title is fetched
//! through the public oEmbed endpoint and attached as a structured link.
//! Enrichment is best effort: any failure leaves the item untouched.

use crate::item::{Link, LinkKind, NewItem};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

/// Title an item gets from the quick-capture "link" action. Enrichment
/// replaces it with the fetched video title.
pub const PLACEHOLDER_TITLE: &str = "Link";

pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

static RE_YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?(youtube\.com/watch\?v=|youtu\.be/)").expect("valid youtube regex")
});

/// Whether `text` starts with a YouTube watch or short URL
pub fn is_youtube_url(text: &str) -> bool {
    RE_YOUTUBE.is_match(text)
}

/// Errors raised while fetching link metadata. Never surfaced past item creation.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("response has no title")]
    MissingTitle,
}

/// Looks up a human readable title for a URL.
pub trait TitleFetcher: Send + Sync {
    fn fetch_title(&self, url: &str) -> Result<String, EnrichError>;
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
}

/// oEmbed client backed by a blocking `ureq` agent
#[derive(Debug, Clone)]
pub struct OEmbedClient {
    endpoint: String,
    timeout: Duration,
}

impl Default for OEmbedClient {
    fn default() -> Self {
        Self::new(DEFAULT_OEMBED_ENDPOINT, Duration::from_secs(10))
    }
}

impl OEmbedClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

impl TitleFetcher for OEmbedClient {
    fn fetch_title(&self, url: &str) -> Result<String, EnrichError> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();

        let resp = match agent
            .get(&self.endpoint)
            .query("url", url)
            .query("format", "json")
            .call()
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => return Err(EnrichError::Status(code)),
            Err(ureq::Error::Transport(transport)) => {
                return Err(EnrichError::Transport(transport.to_string()));
            }
        };

        let body = resp
            .into_string()
            .map_err(|e| EnrichError::Transport(e.to_string()))?;
        parse_title(&body)
    }
}

/// Extract the `title` field from an oEmbed JSON document
pub fn parse_title(body: &str) -> Result<String, EnrichError> {
    let parsed: OEmbedResponse =
        serde_json::from_str(body).map_err(|e| EnrichError::Parse(e.to_string()))?;
    parsed
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or(EnrichError::MissingTitle)
}

/// Decorate a new item with link metadata if its body is a YouTube URL.
///
/// On success the item gets exactly one `youtube` link and, if its title is
/// the [`PLACEHOLDER_TITLE`], the video title. On failure the item is
/// returned unchanged.
pub fn enrich_new_item(mut item: NewItem, fetcher: &dyn TitleFetcher) -> NewItem {
    let Some(url) = item.body.as_deref().map(str::trim).filter(|b| is_youtube_url(b)) else {
        return item;
    };
    let url = url.to_string();

    tracing::debug!("Fetching video title for {}", url);
    match fetcher.fetch_title(&url) {
        Ok(title) => {
            if item.title == PLACEHOLDER_TITLE {
                item.title = title.clone();
            }
            item.links = vec![Link::new(url, LinkKind::Youtube).with_title(title)];
        }
        Err(e) => {
            tracing::warn!("Failed to fetch YouTube title for {}: {}", url, e);
        }
    }
    item
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::item::ItemType;

    /// Always answers with a fixed title
    pub(crate) struct StaticTitle(pub &'static str);

    impl TitleFetcher for StaticTitle {
        fn fetch_title(&self, _url: &str) -> Result<String, EnrichError> {
            Ok(self.0.to_string())
        }
    }

    /// Simulates an unreachable network
    pub(crate) struct Offline;

    impl TitleFetcher for Offline {
        fn fetch_title(&self, _url: &str) -> Result<String, EnrichError> {
            Err(EnrichError::Transport("network unreachable".into()))
        }
    }

    #[test]
    fn test_recognizes_youtube_urls() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("http://youtube.com/watch?v=abc"));
        assert!(is_youtube_url("https://youtu.be/abc123"));
        assert!(!is_youtube_url("https://vimeo.com/123"));
        assert!(!is_youtube_url("see https://youtu.be/abc123"));
        assert!(!is_youtube_url("https://www.youtube.com/channel/xyz"));
    }

    #[test]
    fn test_parse_title() {
        assert_eq!(parse_title(r#"{"title":"Never Gonna","author_name":"Rick"}"#).unwrap(), "Never Gonna");
        assert!(matches!(parse_title(r#"{"author_name":"Rick"}"#), Err(EnrichError::MissingTitle)));
        assert!(matches!(parse_title("<html>"), Err(EnrichError::Parse(_))));
    }

    #[test]
    fn test_enrich_replaces_placeholder_title() {
        let item = NewItem::new(ItemType::Link, PLACEHOLDER_TITLE).body("https://youtu.be/abc123");
        let enriched = enrich_new_item(item, &StaticTitle("Rust in 100 Seconds"));

        assert_eq!(enriched.title, "Rust in 100 Seconds");
        assert_eq!(enriched.links.len(), 1);
        assert_eq!(enriched.links[0].kind, LinkKind::Youtube);
        assert_eq!(enriched.links[0].url, "https://youtu.be/abc123");
        assert_eq!(enriched.links[0].title.as_deref(), Some("Rust in 100 Seconds"));
    }

    #[test]
    fn test_enrich_keeps_custom_title() {
        let item = NewItem::new(ItemType::Link, "Watch later").body("https://youtu.be/abc123");
        let enriched = enrich_new_item(item, &StaticTitle("Rust in 100 Seconds"));
        assert_eq!(enriched.title, "Watch later");
        assert_eq!(enriched.links.len(), 1);
    }

    #[test]
    fn test_enrich_failure_leaves_item_unchanged() {
        let item = NewItem::new(ItemType::Link, PLACEHOLDER_TITLE).body("https://youtu.be/abc123");
        let enriched = enrich_new_item(item.clone(), &Offline);
        assert_eq!(enriched, item);
    }

    #[test]
    fn test_enrich_ignores_other_bodies() {
        let item = NewItem::new(ItemType::Note, "Groceries").body("milk, eggs");
        let enriched = enrich_new_item(item.clone(), &StaticTitle("unused"));
        assert_eq!(enriched, item);
    }
}
