//! Shared helpers for the integration tests. Every test talks to a local
//! mockito server; none of them reach the real registry.

use mockito::{Mock, Server, ServerGuard};
use npm_crawler::registry::{Options, Registry};
use serde_json::{json, Value};
use std::time::Duration;

/// Starts a mock server and a registry client pointed at it for both the
/// registry and the downloads API.
#[allow(dead_code)]
pub async fn mock_registry() -> (ServerGuard, Registry) {
    let server = Server::new_async().await;
    let options = Options::new()
        .registry_url(server.url())
        .downloads_url(server.url())
        .timeout(Duration::from_secs(5));
    let registry = Registry::new(options).expect("registry client");
    (server, registry)
}

/// Minimal packument whose `latest` version depends on `deps`
#[allow(dead_code)]
pub fn packument(name: &str, deps: &[&str]) -> Value {
    let dependencies: serde_json::Map<String, Value> = deps
        .iter()
        .map(|dep| (dep.to_string(), json!("^1.0.0")))
        .collect();

    json!({
        "_id": name,
        "name": name,
        "dist-tags": { "latest": "1.0.0" },
        "versions": {
            "1.0.0": {
                "name": name,
                "version": "1.0.0",
                "dependencies": dependencies
            }
        },
        "time": {
            "created": "2020-01-01T00:00:00.000Z",
            "modified": "2021-06-01T12:00:00.000Z",
            "1.0.0": "2020-01-01T00:00:00.000Z"
        }
    })
}

/// Serves `body` as JSON on GET `path`
#[allow(dead_code)]
pub async fn serve_json(server: &mut ServerGuard, path: &str, body: &Value) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}
