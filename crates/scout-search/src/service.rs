//! Search service: fetch, extract, bound.

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::extractor::Extractor;
use crate::fetcher::PageFetcher;
use crate::types::{SearchRequest, SearchResult, effective_limit};

/// Orchestrates one search: clamp the limit, fetch the page once, extract.
///
/// Holds no per-call state, so a single instance serves every concurrent
/// call. Fetch and parse failures are returned unchanged.
#[derive(Clone)]
pub struct SearchService {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Extractor,
}

impl SearchService {
    /// Create a service over the given fetcher and extractor.
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: Extractor) -> Self {
        Self { fetcher, extractor }
    }

    /// Create a service with the default extractor markers.
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Ok(Self::new(fetcher, Extractor::new()?))
    }

    /// Search for `query`, returning at most the effective limit of results.
    pub async fn search(&self, query: &str, limit: Option<i64>) -> Result<Vec<SearchResult>> {
        self.fetch_and_extract(query, effective_limit(limit)).await
    }

    /// Run an already validated request.
    pub async fn run(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        self.fetch_and_extract(&request.query, effective_limit(Some(request.limit as i64)))
            .await
    }

    async fn fetch_and_extract(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let start = Instant::now();
        tracing::debug!(query, limit, "Search started");

        let html = self.fetcher.fetch_page(query).await?;
        let mut results = self.extractor.extract(&html, limit)?;
        results.truncate(limit);

        tracing::info!(
            limit,
            count = results.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Search completed"
        );
        Ok(results)
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("markers", self.extractor.markers())
            .finish()
    }
}
