//! Upstream page retrieval.
//!
//! [`PageFetcher`] is the seam between the search service and the network.
//! [`HttpFetcher`] is the production implementation: a single GET against a
//! fixed endpoint with the query as the `q` parameter and a desktop-browser
//! User-Agent, so the upstream serves its regular HTML page rather than a
//! bot challenge. There is no retry and no caching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{Result, SearchError};

/// Default upstream results page.
pub const DEFAULT_ENDPOINT: &str = "https://www.google.com/search";

/// Default desktop-browser User-Agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves the upstream results page for a query.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the results page for `query` and return its body as text.
    ///
    /// Fails with [`SearchError::Fetch`] on network failure, timeout, or a
    /// non-success HTTP status.
    async fn fetch_page(&self, query: &str) -> Result<String>;
}

/// Configuration for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Results page URL; the query is appended as `q`.
    pub endpoint: String,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// `Accept-Language` header value.
    pub accept_language: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

impl FetcherConfig {
    /// Create a config for a custom endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fetches results pages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    endpoint: Url,
    accept_language: String,
}

impl HttpFetcher {
    /// Create a fetcher with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a fetcher with custom configuration.
    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| SearchError::config(format!("invalid endpoint '{}': {e}", config.endpoint)))?;

        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(SearchError::config(format!(
                "endpoint must be http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SearchError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            accept_language: config.accept_language,
        })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", query)])
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", &self.accept_language)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::fetch("upstream request timed out")
                } else {
                    SearchError::fetch(format!("upstream request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::fetch(format!(
                "upstream returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::fetch(format!("failed to read upstream response: {e}")))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Upstream page fetched");
        Ok(body)
    }
}
