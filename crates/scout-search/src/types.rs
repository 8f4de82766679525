//! Search data model.

use serde::{Deserialize, Serialize};

/// Number of results returned when the caller does not ask for a count.
pub const DEFAULT_LIMIT: usize = 5;

/// Smallest effective limit.
pub const MIN_LIMIT: usize = 1;

/// Largest effective limit, enforced server-side whatever the caller asks for.
pub const MAX_LIMIT: usize = 10;

/// A single search result scraped from the upstream results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display title of the result. Never empty.
    pub title: String,
    /// Absolute URL of the result. Always starts with `http`.
    pub url: String,
    /// Snippet shown under the result. May be empty.
    pub description: String,
}

impl SearchResult {
    /// Create a new search result.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}

/// A validated search request.
///
/// Only built after the caller's arguments have been checked, so `query` is
/// non-blank and `limit` is already the effective limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// The search query.
    pub query: String,
    /// Effective result limit, within `[MIN_LIMIT, MAX_LIMIT]`.
    pub limit: usize,
}

impl SearchRequest {
    /// Create a request, clamping the requested limit.
    pub fn new(query: impl Into<String>, limit: Option<i64>) -> Self {
        Self {
            query: query.into(),
            limit: effective_limit(limit),
        }
    }
}

/// Compute the effective limit for a caller-requested value.
///
/// Absent means [`DEFAULT_LIMIT`]; anything else is clamped to
/// `[MIN_LIMIT, MAX_LIMIT]` rather than rejected.
pub fn effective_limit(requested: Option<i64>) -> usize {
    match requested {
        None => DEFAULT_LIMIT,
        Some(n) => n.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as usize,
    }
}
