//! Scout - web search served as an MCP tool over HTTP.

mod app;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use scout_search::{DEFAULT_ENDPOINT, FetcherConfig};
use scout_server::config::{DEFAULT_MAX_BODY_SIZE, DEFAULT_PORT};
use scout_server::{Server, ServerConfig};
use tracing::{info, warn};

/// Scout - web search for AI agents, over MCP
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind to
    #[arg(long, env = "SCOUT_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Upstream search page URL
    #[arg(long, env = "SCOUT_UPSTREAM_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "SCOUT_TIMEOUT_SECS", default_value_t = 10,
          value_parser = clap::value_parser!(u64).range(1..=300))]
    timeout_secs: u64,

    /// Largest accepted request body in bytes
    #[arg(long, env = "SCOUT_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_SIZE)]
    max_body_bytes: usize,

    /// Directory for daily rolling JSON logs
    #[arg(long, env = "SCOUT_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::new(&self.endpoint).with_timeout(Duration::from_secs(self.timeout_secs))
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig::new(SocketAddr::new(self.bind, self.port))
            .with_max_body_size(self.max_body_bytes)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = app::init_tracing(cli.verbose, cli.log_dir.as_deref())?;

    let dispatcher = app::build_dispatcher(&cli.fetcher_config())
        .context("failed to initialize search tool")?;

    let config = cli.server_config();
    let listener = scout_server::bind(config.bind_address).await?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.bind_address,
        "Scout listening"
    );

    Server::new(dispatcher, config)
        .run_with_shutdown(listener, shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining requests");
}
