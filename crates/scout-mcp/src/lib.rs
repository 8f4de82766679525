//! MCP (Model Context Protocol) dispatch for Scout.
//!
//! This crate turns JSON-RPC requests into tool calls. It knows nothing about
//! HTTP; the transport hands it parsed requests and serializes what comes back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  McpDispatcher                                              │
//! │  - initialize, ping, tools/list, tools/call                 │
//! │  - Maps tool failures to JSON-RPC error codes               │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ToolRegistry                                               │
//! │  - Built once at startup, read-only afterwards              │
//! │  - SearchTool → scout_search::SearchService                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use scout_mcp::{McpDispatcher, SearchTool, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(SearchTool::new(service));
//! let dispatcher = Arc::new(McpDispatcher::new(registry));
//!
//! if let Some(response) = dispatcher.handle(request).await {
//!     send(serde_json::to_vec(&response)?);
//! }
//! ```
//!
//! # Error codes
//!
//! | Failure                         | Code     |
//! |---------------------------------|----------|
//! | Body is not JSON                | `-32700` |
//! | Not a JSON-RPC request          | `-32600` |
//! | Unknown method or tool          | `-32601` |
//! | Invalid tool arguments          | `-32602` |
//! | Anything unexpected             | `-32603` |
//! | Upstream page not fetched       | `-32001` |
//! | Upstream page not parseable     | `-32002` |

pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod tool;
pub mod tools;

// Re-export main types
pub use dispatcher::{CallPhase, McpDispatcher};
pub use error::{Result, ToolError};
pub use protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, MCP_PROTOCOL_VERSION, RequestId,
    ServerCapabilities, ServerInfo, ToolContent, ToolInfo, ToolsCapability,
};
pub use tool::{ParamExt, ParameterValidationError, Tool, ToolRegistry, sanitize_text};
pub use tools::{SEARCH_TOOL_NAME, SearchParams, SearchTool};
