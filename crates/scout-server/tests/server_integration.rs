//! Server integration tests.
//!
//! A real server on a local port, searching a mock upstream over HTTP.

mod common;

use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{RESULTS_PAGE, TestServer};

async fn mount_results_page(server: &TestServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .mount(&server.upstream)
        .await;
}

#[tokio::test]
async fn test_server_health_returns_version() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server
        .client
        .get(format!("{}/health", server.base_url()))
        .send()
        .await?;
    assert!(resp.status().is_success());

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    assert!(body.get("version").is_some());

    Ok(())
}

#[tokio::test]
async fn test_initialize_handshake() -> Result<()> {
    let server = TestServer::start().await?;

    let body = server
        .rpc(
            1,
            "initialize",
            Some(json!({
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": {"name": "integration", "version": "1.0"}
            })),
        )
        .await?;
    assert_eq!(body["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(body["result"]["serverInfo"]["name"], "scout");

    let resp = server
        .post_raw(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await?;
    assert_eq!(resp.status().as_u16(), 202);
    assert!(resp.text().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_tools_list_has_only_search() -> Result<()> {
    let server = TestServer::start().await?;

    let body = server.rpc(2, "tools/list", None).await?;
    let tools = body["result"]["tools"].as_array().expect("tools array");
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "search");
    assert_eq!(tools[0]["inputSchema"]["properties"]["query"]["type"], "string");
    assert!(tools[0]["outputSchema"].is_object());

    Ok(())
}

#[tokio::test]
async fn test_search_end_to_end() -> Result<()> {
    let server = TestServer::start().await?;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust programming"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&server.upstream)
        .await;

    let body = server
        .search(json!({"query": "rust programming", "limit": 3}))
        .await?;

    let results = body["result"]["structuredContent"]["results"]
        .as_array()
        .expect("results array");
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["title"], "Rust Programming Language");
    assert_eq!(results[0]["url"], "https://www.rust-lang.org/");

    let text = body["result"]["content"][0]["text"].as_str().expect("text content");
    let from_text: serde_json::Value = serde_json::from_str(text)?;
    assert_eq!(from_text, body["result"]["structuredContent"]);

    Ok(())
}

#[tokio::test]
async fn test_search_default_limit() -> Result<()> {
    let server = TestServer::start().await?;
    mount_results_page(&server).await;

    let body = server.search(json!({"query": "rust"})).await?;
    let results = body["result"]["structuredContent"]["results"]
        .as_array()
        .expect("results array");
    assert_eq!(results.len(), 5);

    Ok(())
}

#[tokio::test]
async fn test_invalid_params_never_reach_upstream() -> Result<()> {
    let server = TestServer::start().await?;
    mount_results_page(&server).await;

    let body = server.search(json!({"limit": 2})).await?;
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(server.upstream_hits().await, 0);

    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_is_fetch_error() -> Result<()> {
    let server = TestServer::start().await?;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server.upstream)
        .await;

    let body = server.search(json!({"query": "rust"})).await?;
    assert_eq!(body["error"]["code"], -32001);
    assert!(body.get("result").is_none());

    Ok(())
}

#[tokio::test]
async fn test_unknown_method() -> Result<()> {
    let server = TestServer::start().await?;

    let body = server.rpc(3, "prompts/list", None).await?;
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["id"], 3);

    Ok(())
}

#[tokio::test]
async fn test_invalid_json_body() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.post_raw("{\"jsonrpc\": ").await?;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["error"]["code"], -32700);

    Ok(())
}

#[tokio::test]
async fn test_get_and_delete_are_rejected() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.client.get(server.mcp_url()).send().await?;
    assert_eq!(resp.status().as_u16(), 405);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["error"]["code"], -32000);

    let resp = server.client.delete(server.mcp_url()).send().await?;
    assert_eq!(resp.status().as_u16(), 405);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_searches() -> Result<()> {
    let server = TestServer::start().await?;
    mount_results_page(&server).await;

    let (a, b, c) = tokio::join!(
        server.search(json!({"query": "a", "limit": 1})),
        server.search(json!({"query": "b", "limit": 2})),
        server.search(json!({"query": "c", "limit": 10})),
    );

    for (body, expected) in [(a?, 1), (b?, 2), (c?, 5)] {
        let results = body["result"]["structuredContent"]["results"]
            .as_array()
            .expect("results array");
        assert_eq!(results.len(), expected);
    }
    assert_eq!(server.upstream_hits().await, 3);

    Ok(())
}
