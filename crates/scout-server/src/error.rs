//! Error types for the server.
//!
//! HTTP-level failures still answer with a JSON-RPC error envelope so MCP
//! clients can parse every response the same way.

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scout_mcp::{JsonRpcError, JsonRpcResponse};
use thiserror::Error;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The HTTP method is not served on this path.
    #[error("Method not allowed.")]
    MethodNotAllowed,

    /// Could not bind the listening socket.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind.
        addr: SocketAddr,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ServerError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                JsonRpcError::new(JsonRpcError::SERVER_ERROR, self.to_string()),
            ),
            ServerError::Bind { .. } | ServerError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, JsonRpcError::internal())
            }
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Server error");
        } else {
            tracing::warn!(status = %status, error = %self, "Client error");
        }

        (status, Json(JsonRpcResponse::failure(None, error))).into_response()
    }
}
