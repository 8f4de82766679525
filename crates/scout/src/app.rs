//! Process setup: logging and one-time construction of the dispatcher.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use scout_mcp::{McpDispatcher, SearchTool, ToolRegistry};
use scout_search::{FetcherConfig, HttpFetcher, SearchService};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const CRATES: &[&str] = &["scout", "scout_search", "scout_mcp", "scout_server"];

fn crate_filter(level: &str, fallback: &str) -> String {
    CRATES
        .iter()
        .map(|c| format!("{c}={level}"))
        .chain(std::iter::once(fallback.to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing: human-readable console output plus an optional daily
/// rolling JSON file in `log_dir`.
///
/// `RUST_LOG` overrides the console filter. The returned guard must be held
/// for the life of the process so buffered file output is flushed.
pub fn init_tracing(verbose: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let console_filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ if verbose => EnvFilter::new(crate_filter("debug", "tower_http=debug,info")),
        _ => EnvFilter::new(crate_filter("info", "warn")),
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("scout")
                .filename_suffix("log")
                .build(dir)
                .with_context(|| format!("failed to open log directory {}", dir.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new(crate_filter("trace", "info")));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(console_filter))
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

/// Build the dispatcher and everything behind it.
///
/// Called once at startup; requests share the result.
pub fn build_dispatcher(fetcher_config: &FetcherConfig) -> Result<Arc<McpDispatcher>> {
    let fetcher = HttpFetcher::with_config(fetcher_config.clone())
        .context("failed to configure upstream fetcher")?;
    let service =
        SearchService::with_fetcher(Arc::new(fetcher)).context("failed to build extractor")?;

    let mut registry = ToolRegistry::new();
    registry.register(SearchTool::new(service));

    tracing::info!(
        endpoint = %fetcher_config.endpoint,
        timeout_secs = fetcher_config.timeout.as_secs(),
        "Search tool ready"
    );
    Ok(Arc::new(McpDispatcher::new(registry)))
}
