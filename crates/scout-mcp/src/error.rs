//! Error types for tool dispatch.

use scout_search::SearchError;
use thiserror::Error;

use crate::protocol::JsonRpcError;
use crate::tool::ParameterValidationError;

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type for tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments failed validation. No I/O was attempted.
    #[error("invalid params: {0}")]
    InvalidParams(#[from] ParameterValidationError),

    /// No tool is registered under the requested name.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// The search pipeline failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Any other unexpected fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a tool not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound(name.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Map to the JSON-RPC error returned to the caller.
    ///
    /// Internal faults get a generic message; the detail stays in the logs.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        match self {
            Self::InvalidParams(e) => JsonRpcError::invalid_params(e.to_string()),
            Self::ToolNotFound(name) => {
                JsonRpcError::method_not_found(format!("Unknown tool: {name}"))
            }
            Self::Search(SearchError::Fetch(msg)) => {
                JsonRpcError::new(JsonRpcError::FETCH_ERROR, format!("Fetch error: {msg}"))
            }
            Self::Search(SearchError::Parse(msg)) => JsonRpcError::new(
                JsonRpcError::PARSE_ERROR_UPSTREAM,
                format!("Parse error: {msg}"),
            ),
            Self::Search(SearchError::Config(_)) | Self::Internal(_) => JsonRpcError::internal(),
        }
    }
}
