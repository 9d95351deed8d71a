//! YouTube video search
//!
//! Searches the YouTube Data API and returns flat video summaries. Saved
//! videos live in the store's `youtube_favorites` table (see
//! [`crate::SqliteStore::add_youtube_favorite`]).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
pub const DEFAULT_MAX_RESULTS: u32 = 25;

/// A video as shown in search results and favorites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail: Option<String>,
    pub published_at: String,
}

/// A search hit annotated with whether it is already saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub video: VideoSummary,
    pub favorited: bool,
}

// Wire format of the search endpoint

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Parse a search response body into summaries, skipping non-video hits
pub fn parse_search_response(body: &str) -> Result<Vec<VideoSummary>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.video_id?;
            let snippet = item.snippet;
            let thumbnail = snippet
                .thumbnails
                .medium
                .or(snippet.thumbnails.default)
                .map(|t| t.url);
            Some(VideoSummary {
                id,
                title: snippet.title,
                channel_title: snippet.channel_title,
                thumbnail,
                published_at: snippet.published_at,
            })
        })
        .collect())
}

/// Client for the YouTube search endpoint
#[derive(Debug, Clone)]
pub struct VideoSearchClient {
    api_key: Option<String>,
    endpoint: String,
    max_results: u32,
    timeout: Duration,
}

impl VideoSearchClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search for videos. A blank query returns nothing without a request.
    pub fn search(&self, query: &str) -> Result<Vec<VideoSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(Error::MissingApiKey)?;

        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        tracing::debug!("Searching videos for '{}'", query);

        let resp = agent
            .get(&self.endpoint)
            .query("part", "snippet")
            .query("maxResults", &self.max_results.to_string())
            .query("q", query)
            .query("type", "video")
            .query("key", key)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => Error::Http(format!("YouTube search failed with status {}", code)),
                ureq::Error::Transport(transport) => Error::Http(format!("YouTube search failed: {}", transport)),
            })?;

        let body = resp.into_string()?;
        parse_search_response(&body)
    }
}
