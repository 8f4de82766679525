//! HTTP routes.

pub mod health;
pub mod mcp;

pub use health::{HealthResponse, health_routes};
pub use mcp::{MCP_PATH, mcp_handler, mcp_routes, method_not_allowed};
