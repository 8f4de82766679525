//! JSON-RPC method dispatch.
//!
//! [`McpDispatcher`] is built once at startup and shared behind an `Arc`.
//! Every call is handled independently; the dispatcher holds no mutable state.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde_json::{Value, json};

use crate::error::ToolError;
use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JSONRPC_VERSION, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo, ToolInfo,
};
use crate::tool::ToolRegistry;

/// Lifecycle of a single `tools/call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// Checking the call envelope and resolving the tool.
    Validating,
    /// The tool is running.
    Executing,
    /// Terminal: the tool returned a result.
    Succeeded,
    /// Terminal: validation or execution failed.
    Failed,
}

impl CallPhase {
    /// Whether this phase ends the call.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validating => "validating",
            Self::Executing => "executing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Routes JSON-RPC requests to MCP handlers and registered tools.
#[derive(Debug)]
pub struct McpDispatcher {
    registry: ToolRegistry,
    server_info: ServerInfo,
    descriptors: Vec<ToolInfo>,
}

impl McpDispatcher {
    /// Create a dispatcher over a fully populated registry.
    pub fn new(registry: ToolRegistry) -> Self {
        Self::with_server_info(registry, ServerInfo::default())
    }

    /// Create a dispatcher with explicit server info.
    pub fn with_server_info(registry: ToolRegistry, server_info: ServerInfo) -> Self {
        let descriptors = registry.descriptors();
        tracing::info!(
            server = %server_info.name,
            tools = ?registry.names(),
            "MCP dispatcher initialized"
        );
        Self {
            registry,
            server_info,
            descriptors,
        }
    }

    /// The tool registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The server info reported by `initialize`.
    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Tool descriptors, computed once at construction.
    pub fn tools(&self) -> &[ToolInfo] {
        &self.descriptors
    }

    /// Handle one request. Returns `None` for notifications.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            tracing::warn!(version = %request.jsonrpc, method = %request.method, "Unsupported JSON-RPC version");
            return request.id.map(|id| {
                JsonRpcResponse::failure(
                    Some(id),
                    JsonRpcError::invalid_request("jsonrpc must be \"2.0\""),
                )
            });
        }

        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        tracing::debug!(%id, method = %request.method, "Handling request");
        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(format!(
                "Method not found: {other}"
            ))),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(Some(id), result),
            Err(error) => JsonRpcResponse::failure(Some(id), error),
        })
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => tracing::info!("Client initialized"),
            "notifications/cancelled" => tracing::debug!("Client cancelled a request"),
            other => tracing::debug!(method = %other, "Ignoring notification"),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            tracing::info!(client = %client.name, version = %client.version, "Client connected");
        }

        let result = InitializeResult {
            protocol_version: params.negotiated_version().to_string(),
            capabilities: ServerCapabilities::tools_only(),
            server_info: self.server_info.clone(),
        };
        to_result(&result)
    }

    fn list_tools(&self) -> Result<Value, JsonRpcError> {
        to_result(&ListToolsResult {
            tools: self.descriptors.clone(),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let mut phase = CallPhase::Validating;

        let params: CallToolParams = match params {
            Some(value @ Value::Object(_)) => serde_json::from_value(value).map_err(|e| {
                trace_phase("<unknown>", &mut phase, CallPhase::Failed);
                JsonRpcError::invalid_params(format!("Invalid tools/call params: {e}"))
            })?,
            _ => {
                trace_phase("<unknown>", &mut phase, CallPhase::Failed);
                return Err(JsonRpcError::invalid_params(
                    "tools/call params must be an object with a 'name'",
                ));
            }
        };
        let name = params.name;

        let Some(tool) = self.registry.get(&name) else {
            trace_phase(&name, &mut phase, CallPhase::Failed);
            return Err(ToolError::not_found(&name).to_rpc_error());
        };

        let args = params
            .arguments
            .unwrap_or_else(|| Value::Object(Default::default()));

        trace_phase(&name, &mut phase, CallPhase::Executing);
        let outcome = AssertUnwindSafe(tool.execute(args)).catch_unwind().await;

        match outcome {
            Ok(Ok(result)) => {
                trace_phase(&name, &mut phase, CallPhase::Succeeded);
                to_result(&result)
            }
            Ok(Err(err)) => {
                trace_phase(&name, &mut phase, CallPhase::Failed);
                match &err {
                    ToolError::InvalidParams(_) | ToolError::ToolNotFound(_) => {
                        tracing::debug!(tool = %name, error = %err, "Tool call rejected");
                    }
                    ToolError::Search(_) => {
                        tracing::warn!(tool = %name, error = %err, "Tool call failed");
                    }
                    ToolError::Internal(_) => {
                        tracing::error!(tool = %name, error = %err, "Tool call failed");
                    }
                }
                Err(err.to_rpc_error())
            }
            Err(payload) => {
                trace_phase(&name, &mut phase, CallPhase::Failed);
                tracing::error!(
                    tool = %name,
                    panic = %panic_message(payload.as_ref()),
                    "Tool panicked"
                );
                Err(JsonRpcError::internal())
            }
        }
    }
}

fn trace_phase(tool: &str, phase: &mut CallPhase, next: CallPhase) {
    tracing::trace!(tool, from = %phase, to = %next, "Tool call phase");
    *phase = next;
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize result");
        JsonRpcError::internal()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
