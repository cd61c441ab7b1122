//! End-to-end tests: a scanned tree served through the request loop.
//!
//! The server runs over in-memory input and output buffers, one request per
//! line, exactly as a client would drive it over stdio.

use std::fs;
use std::path::Path;

use context_index_mcp::catalog::{scan, UriScheme};
use context_index_mcp::mcp::{Dispatcher, LineTransport, McpServer, ServerState};
use serde_json::{json, Value};
use tempfile::TempDir;

const LIB_RS: &str = "//! svc1\n\npub fn greet() -> &'static str {\n    \"héllo\"\n}\n";

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let svc = dir.path().join("svc1");
    fs::create_dir_all(svc.join("src")).unwrap();
    fs::write(svc.join("src/lib.rs"), LIB_RS).unwrap();
    fs::write(svc.join("Cargo.toml"), "[package]\nname = \"svc1\"\n").unwrap();
    dir
}

async fn run(root: &Path, requests: &[Value]) -> Vec<Value> {
    let mut input = String::new();
    for request in requests {
        input.push_str(&request.to_string());
        input.push('\n');
    }
    run_raw(root, input.as_bytes()).await
}

async fn run_raw(root: &Path, input: &[u8]) -> Vec<Value> {
    let report = scan(root);
    let mut server = McpServer::new(
        LineTransport::new(input, Vec::new()),
        Dispatcher::new(report.catalog, UriScheme::new("proto")),
    );

    server.serve().await.unwrap();
    assert_eq!(server.state(), ServerState::ShuttingDown);

    let output = String::from_utf8(server.into_transport().into_writer()).unwrap();
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn list_then_read() {
    let dir = fixture();
    let responses = run(
        dir.path(),
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "resources/read",
                   "params": {"uri": "proto://svc1/src/lib.rs"}}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);

    let list = &responses[0];
    assert_eq!(list["jsonrpc"], "2.0");
    assert_eq!(list["id"], 1);
    let mut uris: Vec<&str> = list["result"]["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["uri"].as_str().unwrap())
        .collect();
    uris.sort_unstable();
    assert_eq!(uris, ["proto://svc1/Cargo.toml", "proto://svc1/src/lib.rs"]);

    let read = &responses[1];
    assert_eq!(read["id"], 2);
    assert_eq!(
        read["result"],
        json!({
            "contents": [{
                "uri": "proto://svc1/src/lib.rs",
                "mimeType": "text/x-rust",
                "text": LIB_RS,
            }]
        })
    );
}

#[tokio::test]
async fn list_entry_metadata() {
    let dir = fixture();
    let responses = run(
        dir.path(),
        &[json!({"id": "list", "method": "resources/list", "params": {"ignored": true}})],
    )
    .await;

    let resources = responses[0]["result"]["resources"].as_array().unwrap();
    let toml = resources
        .iter()
        .find(|r| r["uri"] == "proto://svc1/Cargo.toml")
        .unwrap();
    assert_eq!(
        toml,
        &json!({
            "uri": "proto://svc1/Cargo.toml",
            "name": "svc1/Cargo.toml",
            "description": "svc1 - Cargo.toml",
            "mimeType": "text/x-toml",
        })
    );
}

#[tokio::test]
async fn empty_catalog_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let responses = run(
        &dir.path().join("missing"),
        &[json!({"id": 1, "method": "resources/list"})],
    )
    .await;

    assert_eq!(responses[0]["result"], json!({"resources": []}));
    assert!(responses[0].get("error").is_none());
}

#[tokio::test]
async fn read_errors_use_error_envelope() {
    let dir = fixture();
    let responses = run(
        dir.path(),
        &[
            json!({"id": 1, "method": "resources/read", "params": {"uri": "file:///etc/passwd"}}),
            json!({"id": 2, "method": "resources/read", "params": {"uri": "proto://svc1"}}),
            json!({"id": 3, "method": "resources/read", "params": {"uri": "proto://svc9/a.rs"}}),
            json!({"id": 4, "method": "resources/read", "params": {"uri": "proto://svc1/b.rs"}}),
            json!({"id": 5, "method": "resources/read", "params": {}}),
        ],
    )
    .await;

    let messages: Vec<&str> = responses
        .iter()
        .map(|r| r["error"]["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages[0], "Invalid URI scheme");
    assert_eq!(messages[1], "Invalid resource path");
    assert_eq!(messages[2], "Service not found: svc9");
    assert_eq!(messages[3], "File not found: b.rs");
    assert!(messages[4].contains("resources/read"));

    for (i, response) in responses.iter().enumerate() {
        assert_eq!(response["id"], i + 1);
        assert!(response.get("result").is_none());
    }
}

#[tokio::test]
async fn invalid_utf8_content_is_read_error() {
    let dir = fixture();
    fs::write(dir.path().join("svc1/blob.json"), [0xff_u8, 0xfe, 0x00]).unwrap();

    let responses = run(
        dir.path(),
        &[json!({"id": 1, "method": "resources/read", "params": {"uri": "proto://svc1/blob.json"}})],
    )
    .await;

    let message = responses[0]["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Cannot read file"));
}

#[tokio::test]
async fn unknown_method_uses_success_envelope() {
    let dir = fixture();
    let responses = run(dir.path(), &[json!({"id": 9, "method": "initialize"})]).await;

    assert_eq!(
        responses[0],
        json!({
            "jsonrpc": "2.0",
            "id": 9,
            "result": {"error": "Unknown method: initialize"},
        })
    );
}

#[tokio::test]
async fn malformed_lines_do_not_stop_the_loop() {
    let dir = fixture();
    let input = b"{broken\n\xff\xfe\n{\"id\": 7, \"method\": \"resources/list\"}\r\n";
    let responses = run_raw(dir.path(), input).await;

    assert_eq!(responses.len(), 3);
    for malformed in &responses[..2] {
        assert!(malformed["id"].is_null());
        assert!(malformed["error"]["message"].is_string());
    }
    assert_eq!(responses[2]["id"], 7);
    assert!(responses[2]["result"]["resources"].is_array());
}
