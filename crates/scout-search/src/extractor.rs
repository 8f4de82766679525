//! Result extraction from upstream search-results markup.
//!
//! The results page is treated as a sequence of result blocks identified by
//! a container class. Each block contributes at most one [`SearchResult`],
//! and only when it carries a heading, an anchor, and an absolute `http(s)`
//! link. Everything that ties this module to the upstream page template lives
//! in [`ResultMarkers`], so a markup change touches nothing else.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, SearchError};
use crate::types::SearchResult;

/// Number of leading bytes inspected when deciding whether input is binary.
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// CSS markers identifying the parts of a result block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMarkers {
    /// Container of a single organic result.
    pub block: String,
    /// Heading carrying the result title.
    pub heading: String,
    /// Anchor carrying the result link. The first match in a block is used.
    pub anchor: String,
    /// Snippet text shown under the title.
    pub snippet: String,
}

impl Default for ResultMarkers {
    fn default() -> Self {
        Self {
            block: "div.g".to_string(),
            heading: "h3".to_string(),
            anchor: "a".to_string(),
            snippet: ".VwiC3b".to_string(),
        }
    }
}

/// Compiled selectors for one set of markers.
#[derive(Debug, Clone)]
struct Selectors {
    block: Selector,
    heading: Selector,
    anchor: Selector,
    snippet: Selector,
}

impl Selectors {
    fn compile(markers: &ResultMarkers) -> Result<Self> {
        Ok(Self {
            block: compile("block", &markers.block)?,
            heading: compile("heading", &markers.heading)?,
            anchor: compile("anchor", &markers.anchor)?,
            snippet: compile("snippet", &markers.snippet)?,
        })
    }
}

fn compile(kind: &str, css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearchError::parse(format!("invalid {kind} selector '{css}': {e:?}")))
}

/// Why a candidate block was not turned into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Nested,
    NoTitle,
    NoAnchor,
    NotAbsolute,
}

/// Extracts ordered, bounded search results from a results page.
///
/// Stateless apart from its compiled selectors; one instance is shared by
/// every concurrent search.
#[derive(Debug, Clone)]
pub struct Extractor {
    markers: ResultMarkers,
    selectors: Selectors,
}

impl Extractor {
    /// Create an extractor for the default upstream markers.
    pub fn new() -> Result<Self> {
        Self::with_markers(ResultMarkers::default())
    }

    /// Create an extractor for custom markers.
    pub fn with_markers(markers: ResultMarkers) -> Result<Self> {
        let selectors = Selectors::compile(&markers)?;
        Ok(Self { markers, selectors })
    }

    /// The markers this extractor was built with.
    pub fn markers(&self) -> &ResultMarkers {
        &self.markers
    }

    /// Extract at most `limit` results from `html`, in document order.
    ///
    /// Malformed blocks are skipped. An empty or result-free document yields
    /// an empty vector. Fails only when the input is not text markup at all.
    pub fn extract(&self, html: &str, limit: usize) -> Result<Vec<SearchResult>> {
        ensure_text(html)?;

        if limit == 0 || html.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document = Html::parse_document(html);
        let mut results = Vec::with_capacity(limit);
        let mut accepted_ids = Vec::with_capacity(limit);
        let mut rejected = 0usize;

        for block in document.select(&self.selectors.block) {
            // A block inside an accepted block is the same visual result.
            let outcome = if block.ancestors().any(|a| accepted_ids.contains(&a.id())) {
                Err(Rejection::Nested)
            } else {
                self.extract_block(block)
            };

            match outcome {
                Ok(result) => {
                    accepted_ids.push(block.id());
                    results.push(result);
                    if results.len() >= limit {
                        break;
                    }
                }
                Err(reason) => {
                    rejected += 1;
                    tracing::trace!(?reason, "Result block rejected");
                }
            }
        }

        tracing::debug!(
            accepted = results.len(),
            rejected,
            limit,
            "Search results extracted"
        );
        Ok(results)
    }

    fn extract_block(&self, block: ElementRef<'_>) -> std::result::Result<SearchResult, Rejection> {
        let title = block
            .select(&self.selectors.heading)
            .next()
            .map(collapsed_text)
            .filter(|t| !t.is_empty())
            .ok_or(Rejection::NoTitle)?;

        let anchor = block
            .select(&self.selectors.anchor)
            .next()
            .ok_or(Rejection::NoAnchor)?;

        let url = anchor
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|href| href.starts_with("http"))
            .ok_or(Rejection::NotAbsolute)?;

        let description = block
            .select(&self.selectors.snippet)
            .next()
            .map(collapsed_text)
            .unwrap_or_default();

        Ok(SearchResult::new(title, url, description))
    }
}

/// Reject input that is binary rather than text.
///
/// Uses the null-byte ratio over the first few kilobytes.
fn ensure_text(input: &str) -> Result<()> {
    let check_len = input.len().min(BINARY_SNIFF_LEN);
    let null_count = input.as_bytes()[..check_len]
        .iter()
        .filter(|&&b| b == 0)
        .count();

    if null_count > check_len / 100 && null_count > 10 {
        return Err(SearchError::parse(format!(
            "response is not text markup ({null_count} null bytes in first {check_len} bytes)"
        )));
    }
    Ok(())
}

/// Element text with control characters removed and runs of whitespace
/// collapsed to single spaces.
fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
