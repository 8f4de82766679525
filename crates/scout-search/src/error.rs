//! Error types for the search pipeline.

use thiserror::Error;

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error type for search operations.
///
/// A search can only fail in the two places it touches the outside world:
/// reaching the upstream page, or reading what came back.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The upstream page could not be retrieved (network, timeout, non-2xx).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The upstream response could not be treated as markup at all.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid fetcher or extractor configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Create a fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error came from the network side of the pipeline.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// Check if this error came from reading the upstream document.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}
