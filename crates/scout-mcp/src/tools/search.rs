//! The `search` tool.

use async_trait::async_trait;
use scout_search::{MAX_LIMIT, MIN_LIMIT, SearchRequest, SearchResult, SearchService};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{Result, ToolError};
use crate::protocol::CallToolResult;
use crate::tool::{ParamExt, ParamResult, ParameterValidationError, Tool, json_type_name, sanitize_text};

/// Name the search tool is registered under.
pub const SEARCH_TOOL_NAME: &str = "search";

/// Validated arguments for the search tool.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// The search query, as given.
    pub query: String,
    /// Requested limit, truncated toward zero. `None` when omitted.
    pub limit: Option<i64>,
}

impl SearchParams {
    /// Turn into a request with the effective limit applied.
    pub fn into_request(self) -> SearchRequest {
        SearchRequest::new(self.query, self.limit)
    }
}

impl TryFrom<Value> for SearchParams {
    type Error = ParameterValidationError;

    fn try_from(params: Value) -> ParamResult<Self> {
        if !params.is_object() {
            return Err(ParameterValidationError::invalid_type(
                "arguments",
                "object",
                json_type_name(&params),
            ));
        }

        let query = params.required_str("query", "provide a search query")?;
        if query.trim().is_empty() {
            return Err(ParameterValidationError::invalid_value(
                "query",
                query,
                "query cannot be empty",
            ));
        }

        // Fractions truncate; out-of-range values are clamped later, not rejected.
        let limit = params.optional_number("limit")?.map(|n| n.trunc() as i64);

        Ok(Self {
            query: query.to_string(),
            limit,
        })
    }
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    results: &'a [SearchResult],
}

/// Tool that searches the web and returns the top results.
#[derive(Debug, Clone)]
pub struct SearchTool {
    service: SearchService,
}

impl SearchTool {
    /// Create a search tool over the given service.
    pub fn new(service: SearchService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search the web and return the top results. Each result has a title, a URL and a short description."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "limit": {
                    "type": "number",
                    "description": "Maximum number of results to return",
                    "minimum": MIN_LIMIT,
                    "maximum": MAX_LIMIT,
                    "default": scout_search::DEFAULT_LIMIT
                }
            },
            "required": ["query"]
        })
    }

    fn output_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "results": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "url": {"type": "string"},
                            "description": {"type": "string"}
                        },
                        "required": ["title", "url", "description"]
                    }
                }
            },
            "required": ["results"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<CallToolResult> {
        let request = SearchParams::try_from(args)?.into_request();

        let results: Vec<SearchResult> = self
            .service
            .run(&request)
            .await?
            .into_iter()
            .map(|r| {
                SearchResult::new(
                    sanitize_text(&r.title),
                    r.url,
                    sanitize_text(&r.description),
                )
            })
            .filter(|r| !r.title.is_empty())
            .collect();

        let output = serde_json::to_value(SearchOutput { results: &results })
            .map_err(|e| ToolError::internal(format!("failed to serialize results: {e}")))?;
        CallToolResult::structured(output)
            .map_err(|e| ToolError::internal(format!("failed to render results: {e}")))
    }
}
