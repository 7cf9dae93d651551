//! Mirror probing and link checking against a mock server

use mockito::Server;
use npm_crawler::checker::{check_links, LinkStatus};
use npm_crawler::registry::{probe_url, Mirror, Options};
use std::time::Duration;

fn options_for(url: String) -> Options {
    Options::new().registry_url(url).timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_probe_reachable_registry() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"db_name":"registry","doc_count":12}"#)
        .create_async()
        .await;

    let probe = probe_url(Mirror::NpmMirror, options_for(server.url())).await;
    assert!(probe.reachable);
    assert_eq!(probe.mirror, Mirror::NpmMirror);
    assert_eq!(probe.doc_count, Some(12));
    assert!(probe.error.is_none());
}

#[tokio::test]
async fn test_probe_failing_registry() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("GET", "/").with_status(503).create_async().await;

    let probe = probe_url(Mirror::Cnpm, options_for(server.url())).await;
    assert!(!probe.reachable);
    assert!(probe.error.unwrap().contains("503"));
}

#[tokio::test]
async fn test_check_links() {
    let mut server = Server::new_async().await;
    let _ok = server.mock("HEAD", "/ok").with_status(200).create_async().await;
    let _gone = server.mock("HEAD", "/gone").with_status(404).create_async().await;
    let _no_head = server.mock("HEAD", "/no-head").with_status(405).create_async().await;
    let no_head_get = server.mock("GET", "/no-head").with_status(200).create_async().await;

    let urls = ["/ok", "/gone", "/no-head"]
        .iter()
        .map(|path| format!("{}{}", server.url(), path))
        .collect();

    let mut results = check_links(urls, &options_for(server.url()), 2).await.unwrap();
    results.sort_by(|a, b| a.url.cmp(&b.url));

    no_head_get.assert_async().await;
    let statuses: Vec<_> = results.iter().map(|r| r.status.clone()).collect();
    assert_eq!(statuses, vec![LinkStatus::Broken, LinkStatus::Ok, LinkStatus::Ok]);
    assert!(results.iter().filter(|r| r.is_ok()).count() == 2);
}
