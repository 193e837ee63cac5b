//! HTTP client for the hosted web-search API.
//!
//! Wraps `reqwest` with typed error handling, API key management, and
//! transient-failure retry. The API returns Google-style result pages; only
//! the `organic` array is consumed.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::SearchError;
use crate::retry::retry_with_backoff;
use crate::types::{OrganicResult, SearchRequest, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://google.serper.dev/";
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_BACKOFF_BASE_MS: u64 = 1_000;

/// Client for the web-search API.
///
/// Use [`SearchClient::new`] for production or
/// [`SearchClient::with_base_url`] to point at a mock server in tests.
pub struct SearchClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl SearchClient {
    /// Creates a new client pointed at the production search API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("helix/0.1 (opportunity-discovery)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends the endpoint path instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Override the transient-failure retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Run one search query and return its organic results.
    ///
    /// Transient failures (timeout, connect, 5xx) are retried with
    /// exponential back-off; 4xx and malformed bodies are returned
    /// immediately. Callers treat a per-query failure as soft: log it and
    /// move on to the next query.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Http`] on network failure or a non-2xx HTTP status
    ///   once retries are exhausted.
    /// - [`SearchError::Deserialize`] if the response body does not match
    ///   the expected shape.
    pub async fn search(
        &self,
        query: &str,
        page_size: u32,
    ) -> Result<Vec<OrganicResult>, SearchError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.send_search(query, page_size)
        })
        .await
    }

    async fn send_search(
        &self,
        query: &str,
        page_size: u32,
    ) -> Result<Vec<OrganicResult>, SearchError> {
        let url = self.endpoint_url();
        let body = SearchRequest {
            q: query,
            num: page_size,
        };

        let response = self
            .client
            .post(url)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let text = response.text().await?;

        let parsed: SearchResponse =
            serde_json::from_str(&text).map_err(|e| SearchError::Deserialize {
                context: format!("search(query={query})"),
                source: e,
            })?;

        Ok(parsed.organic)
    }

    fn endpoint_url(&self) -> Url {
        // base_url is normalised to end in '/' so join cannot fail here;
        // fall back to the base itself if it somehow does.
        self.base_url
            .join("search")
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> SearchClient {
        SearchClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_url_appends_search_path() {
        let client = test_client("https://google.serper.dev");
        assert_eq!(client.endpoint_url().as_str(), "https://google.serper.dev/search");
    }

    #[test]
    fn endpoint_url_strips_trailing_slash() {
        let client = test_client("https://google.serper.dev///");
        assert_eq!(client.endpoint_url().as_str(), "https://google.serper.dev/search");
    }

    #[test]
    fn with_base_url_rejects_garbage() {
        let result = SearchClient::with_base_url("key", 30, "not a url");
        assert!(matches!(result, Err(SearchError::InvalidBaseUrl { .. })));
    }
}
