//! Thread fetchers for the supported discussion platforms.
//!
//! Each fetcher walks the platform's reply tree within [`TraversalLimits`] and
//! flattens it into a single `User/Text/Link` document suitable for a language
//! model.

mod bluesky;
mod hacker_news;
mod reddit;

use crate::model::{SourceKind, ThreadContent};
use thiserror::Error;
use tracing::{info, warn};

pub const HACKER_NEWS_API: &str = "https://hacker-news.firebaseio.com/v0";
pub const REDDIT_ORIGIN: &str = "https://www.reddit.com";
pub const BLUESKY_XRPC: &str = "https://public.api.bsky.app/xrpc";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unsupported source: {0}")]
    Unsupported(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{platform} returned HTTP {status} for {url}")]
    Status {
        platform: SourceKind,
        status: u16,
        url: String,
    },

    #[error("Malformed {platform} response: {message}")]
    Malformed {
        platform: SourceKind,
        message: String,
    },

    #[error("{0}")]
    NotFound(String),
}

/// Upper bounds on how much of a reply tree is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalLimits {
    pub max_comments: usize,
    pub max_depth: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_comments: 100,
            max_depth: 10,
        }
    }
}

/// Base URLs for each platform API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoints {
    pub hacker_news: String,
    pub reddit: String,
    pub bluesky: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            hacker_news: HACKER_NEWS_API.to_string(),
            reddit: REDDIT_ORIGIN.to_string(),
            bluesky: BLUESKY_XRPC.to_string(),
        }
    }
}

/// Decide which platform an input refers to.
pub fn detect_source(input: &str) -> Option<SourceKind> {
    let trimmed = input.trim();
    let numeric = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit());

    if numeric || input.contains("news.ycombinator.com") {
        Some(SourceKind::HackerNews)
    } else if input.contains("reddit.com") {
        Some(SourceKind::Reddit)
    } else if input.contains("bsky.app") {
        Some(SourceKind::Bluesky)
    } else {
        None
    }
}

pub const USER_AGENT: &str = concat!("threadweaver/", env!("CARGO_PKG_VERSION"));

/// Client identifying itself with [`USER_AGENT`]; Reddit throttles anonymous agents.
fn http_client() -> reqwest::Client {
    match reqwest::Client::builder().user_agent(USER_AGENT).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("HTTP client setup failed, requests go out without a user agent: {}", e);
            reqwest::Client::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThreadFetcher {
    client: reqwest::Client,
    endpoints: SourceEndpoints,
    limits: TraversalLimits,
}

impl Default for ThreadFetcher {
    fn default() -> Self {
        Self::new(SourceEndpoints::default(), TraversalLimits::default())
    }
}

impl ThreadFetcher {
    pub fn new(endpoints: SourceEndpoints, limits: TraversalLimits) -> Self {
        Self {
            client: http_client(),
            endpoints,
            limits,
        }
    }

    pub fn limits(&self) -> TraversalLimits {
        self.limits
    }

    pub async fn fetch(&self, input: &str) -> Result<ThreadContent, SourceError> {
        let kind =
            detect_source(input).ok_or_else(|| SourceError::Unsupported(input.to_string()))?;
        info!(source = %kind, input, "fetching thread");

        let content = match kind {
            SourceKind::HackerNews => hacker_news::fetch(self, input).await?,
            SourceKind::Reddit => reddit::fetch(self, input).await?,
            SourceKind::Bluesky => bluesky::fetch(self, input).await?,
        };

        info!(
            source = %kind,
            chars = content.text.chars().count(),
            "thread flattened"
        );
        Ok(content)
    }

    /// GET `url` and decode JSON, mapping non-success statuses to [`SourceError::Status`].
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        platform: SourceKind,
        url: &str,
    ) -> Result<T, SourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                platform,
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Malformed {
            platform,
            message: e.to_string(),
        })
    }
}
