//! The `/mcp` endpoint.
//!
//! Only POST carries protocol payloads. Each POST body is a single JSON-RPC
//! request or notification; batches are not supported and are answered as
//! invalid requests.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use scout_mcp::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
use serde_json::Value;

use crate::error::ServerError;
use crate::state::AppState;

/// Path the MCP endpoint is served on.
pub const MCP_PATH: &str = "/mcp";

/// Handle a JSON-RPC message.
///
/// Protocol-level failures are still HTTP 200 with a JSON-RPC error body.
/// Notifications are acknowledged with 202 and no body.
pub async fn mcp_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected non-JSON body");
            return rpc_reply(JsonRpcResponse::failure(None, JsonRpcError::parse_error()));
        }
    };

    let id = recover_id(&value);
    let request: JsonRpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected malformed JSON-RPC request");
            return rpc_reply(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request(format!("Invalid Request: {e}")),
            ));
        }
    };

    match state.dispatcher.handle(request).await {
        Some(response) => rpc_reply(response),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Reject methods other than POST.
pub async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}

/// Create the MCP route.
pub fn mcp_routes() -> Router<AppState> {
    Router::new().route(
        MCP_PATH,
        post(mcp_handler)
            .get(method_not_allowed)
            .delete(method_not_allowed),
    )
}

fn rpc_reply(response: JsonRpcResponse) -> Response {
    (StatusCode::OK, Json(response)).into_response()
}

/// Best-effort id of a message that failed request validation.
fn recover_id(value: &Value) -> Option<RequestId> {
    value
        .get("id")
        .and_then(|id| serde_json::from_value(id.clone()).ok())
}
