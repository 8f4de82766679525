//! Search result extraction pipeline for Scout.
//!
//! This crate turns a query into a short, ordered list of search results by
//! scraping a public results page.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SearchService                                              │
//! │  - Clamps the limit (default 5, max 10)                     │
//! │  - One fetch per call, then extraction                      │
//! └─────────────────────────────────────────────────────────────┘
//!              │                               │
//!              ▼                               ▼
//!       ┌──────────────┐               ┌──────────────┐
//!       │ PageFetcher  │               │  Extractor   │
//!       │ (HTTP GET)   │               │ (CSS markers)│
//!       └──────────────┘               └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scout_search::{HttpFetcher, SearchService};
//!
//! let fetcher = Arc::new(HttpFetcher::new()?);
//! let service = SearchService::with_fetcher(fetcher)?;
//!
//! for result in service.search("rust programming", Some(3)).await? {
//!     println!("{} - {}", result.title, result.url);
//! }
//! ```

pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod service;
pub mod types;

pub use error::{Result, SearchError};
pub use extractor::{Extractor, ResultMarkers};
pub use fetcher::{
    DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FetcherConfig, HttpFetcher, PageFetcher,
};
pub use service::SearchService;
pub use types::{
    DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT, SearchRequest, SearchResult, effective_limit,
};
