//! Resource search — DuckDuckGo Instant Answer lookup for a query.
//!
//! DESIGN
//! ======
//! `ResourceSearch` is the seam route handlers depend on, so tests can swap
//! in a canned fetcher. The real client never fails outward: transport,
//! status and parse errors become a single explanatory resource, and an
//! empty answer becomes a "nothing found" resource. Parsing is a pure
//! function over the response text.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::messages::Messages;
use crate::model::Resource;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(String),
    #[error("search returned status {0}")]
    Status(u16),
    #[error("search response parse failed: {0}")]
    Parse(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Produces resources for a free-text query.
#[async_trait::async_trait]
pub trait ResourceSearch: Send + Sync {
    /// Look up `query`. Always yields at least one resource.
    async fn search(&self, query: &str) -> Vec<Resource>;
}

// =============================================================================
// DUCKDUCKGO CLIENT
// =============================================================================

pub struct DuckDuckGoSearch {
    http: reqwest::Client,
    base_url: String,
    limit: usize,
    messages: &'static Messages,
}

impl DuckDuckGoSearch {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SearchConfig, messages: &'static Messages) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| SearchError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), limit: config.limit, messages })
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Resource>, SearchError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("no_redirect", "1"), ("no_html", "1")])
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        parse_related_topics(&text, self.limit)
    }
}

#[async_trait::async_trait]
impl ResourceSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Vec<Resource> {
        match self.lookup(query).await {
            Ok(results) if results.is_empty() => {
                debug!(query, "search returned no topics");
                vec![Resource::new(self.messages.nothing_found_title, self.messages.nothing_found_snippet, "")]
            }
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, query, "search failed");
                vec![Resource::new(self.messages.search_failed_title, self.messages.search_failed(&e.to_string()), "")]
            }
        }
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Extract up to `limit` resources from an Instant Answer response.
///
/// Every `RelatedTopics` entry carrying both `Text` and `FirstURL` becomes a
/// resource; grouped entries contribute their nested `Topics` right after
/// the parent.
///
/// # Errors
///
/// Returns an error if the body is not JSON.
pub fn parse_related_topics(json: &str, limit: usize) -> Result<Vec<Resource>, SearchError> {
    let body: Value = serde_json::from_str(json).map_err(|e| SearchError::Parse(e.to_string()))?;

    let mut results = Vec::new();
    let topics = body.get("RelatedTopics").and_then(Value::as_array);
    for topic in topics.into_iter().flatten() {
        results.extend(topic_resource(topic));
        let nested = topic.get("Topics").and_then(Value::as_array);
        results.extend(nested.into_iter().flatten().filter_map(topic_resource));
    }

    results.truncate(limit);
    Ok(results)
}

fn topic_resource(topic: &Value) -> Option<Resource> {
    let text = topic.get("Text").and_then(Value::as_str).filter(|s| !s.is_empty())?;
    let url = topic.get("FirstURL").and_then(Value::as_str).filter(|s| !s.is_empty())?;
    Some(Resource::new(text, text, url))
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
