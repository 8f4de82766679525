//! Common test utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use wiremock::MockServer;

use scout_mcp::{McpDispatcher, SearchTool, ToolRegistry};
use scout_search::{FetcherConfig, HttpFetcher, SearchService};
use scout_server::{Server, ServerConfig};

/// Canned upstream results page.
pub const RESULTS_PAGE: &str = include_str!("../../../scout-search/test-data/results.html");

/// A test server that runs in the background, searching a mock upstream.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// HTTP client for talking to the server.
    pub client: Client,
    /// Mock upstream search provider.
    pub upstream: MockServer,
    /// Handle to the server task.
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server. Mount upstream responses on `upstream` as needed.
    pub async fn start() -> Result<Self> {
        let upstream = MockServer::start().await;
        let addr = find_available_port().await?;

        let fetcher = HttpFetcher::with_config(
            FetcherConfig::new(format!("{}/search", upstream.uri()))
                .with_timeout(Duration::from_secs(2)),
        )?;
        let service = SearchService::with_fetcher(Arc::new(fetcher))?;
        let mut registry = ToolRegistry::new();
        registry.register(SearchTool::new(service));
        let dispatcher = Arc::new(McpDispatcher::new(registry));

        let config = ServerConfig::new(addr).with_request_logging(false);

        // Start server in background
        let server = Server::new(dispatcher, config);
        let handle = tokio::spawn(async move {
            let _ = server.run_on(addr).await;
        });

        // Wait for server to be ready
        let client = Client::new();
        wait_for_server(&client, addr).await?;

        Ok(Self {
            addr,
            client,
            upstream,
            _handle: handle,
        })
    }

    /// Get the base URL for the server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the MCP endpoint URL.
    pub fn mcp_url(&self) -> String {
        format!("{}/mcp", self.base_url())
    }

    /// POST a raw JSON-RPC body to `/mcp`.
    pub async fn post_raw(&self, body: impl Into<String>) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.mcp_url())
            .header("content-type", "application/json")
            .body(body.into())
            .send()
            .await?)
    }

    /// Send a JSON-RPC request and return the parsed response body.
    pub async fn rpc(&self, id: i64, method: &str, params: Option<Value>) -> Result<Value> {
        let mut request = json!({"jsonrpc": "2.0", "id": id, "method": method});
        if let Some(params) = params {
            request["params"] = params;
        }
        let resp = self.post_raw(request.to_string()).await?;
        anyhow::ensure!(resp.status().is_success(), "unexpected status {}", resp.status());
        Ok(resp.json().await?)
    }

    /// Call the `search` tool.
    pub async fn search(&self, arguments: Value) -> Result<Value> {
        self.rpc(
            1,
            "tools/call",
            Some(json!({"name": "search", "arguments": arguments})),
        )
        .await
    }

    /// Number of requests the mock upstream has received.
    pub async fn upstream_hits(&self) -> usize {
        self.upstream
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

/// Find an available port for the test server.
async fn find_available_port() -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

/// Wait for the server to become ready.
async fn wait_for_server(client: &Client, addr: SocketAddr) -> Result<()> {
    let url = format!("http://{}/health", addr);

    let result = timeout(Duration::from_secs(5), async {
        loop {
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return,
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    })
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(_) => anyhow::bail!("Timeout waiting for server to start"),
    }
}
