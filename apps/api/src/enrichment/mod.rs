//! Profile Enrichment: resolves a competitive-programming profile link to a
//! username and fetches its public JSON summary.
//!
//! Enrichment is best effort: every failure is logged and swallowed, and the
//! link the user typed is kept as-is.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::models::links::Link;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Profile API returned status {0}")]
    Status(u16),

    #[error("Profile base URL cannot take a username segment")]
    BadBaseUrl,
}

/// Source of public profile summaries, keyed by username.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_summary(&self, username: &str) -> Result<Value, EnrichmentError>;
}

/// Read-only client for the public LeetCode summary API.
#[derive(Clone)]
pub struct LeetCodeClient {
    client: Client,
    base_url: Url,
}

impl LeetCodeClient {
    pub fn new(base_url: Url) -> Result<Self, EnrichmentError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    fn summary_url(&self, username: &str) -> Result<Url, EnrichmentError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EnrichmentError::BadBaseUrl)?
            .pop_if_empty()
            .push(username);
        Ok(url)
    }
}

#[async_trait]
impl ProfileSource for LeetCodeClient {
    async fn fetch_summary(&self, username: &str) -> Result<Value, EnrichmentError> {
        let url = self.summary_url(username)?;

        // Always fetch fresh.
        let response = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Derives a username from a profile URL or a bare username.
///
/// Input that does not parse as a URL is taken literally (trimmed). For a URL,
/// the last non-empty path segment is the username.
pub fn extract_username(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(url) => url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .last()
            .map(String::from),
        Err(_) => Some(trimmed.to_string()),
    }
}

/// Enriches a single link. Returns the link unchanged when there is nothing to
/// look up or the lookup fails.
pub async fn enrich_link(source: &dyn ProfileSource, link: &Link) -> Link {
    let Some(username) = extract_username(link.url()) else {
        return link.clone();
    };

    match source.fetch_summary(&username).await {
        Ok(profile) => {
            info!("Enriched profile for '{username}'");
            Link::Enriched {
                url: link.url().to_string(),
                profile,
            }
        }
        Err(e) => {
            warn!("Profile enrichment for '{username}' skipped: {e}");
            link.clone()
        }
    }
}
