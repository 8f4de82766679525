//! Application state shared across handlers.

use std::sync::Arc;

use scout_mcp::McpDispatcher;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// Cloned per request; everything inside is read-only.
#[derive(Clone)]
pub struct AppState {
    /// The dispatcher, built once at startup.
    pub dispatcher: Arc<McpDispatcher>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(dispatcher: Arc<McpDispatcher>, config: ServerConfig) -> Self {
        Self {
            dispatcher,
            config: Arc::new(config),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tools", &self.dispatcher.registry().names())
            .field("config", &self.config)
            .finish()
    }
}
