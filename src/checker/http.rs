// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Falls back to GET when a server refuses HEAD (405 / 501)
// - Detects various failure modes (404, timeout, SSL errors, etc.)
// - Runs checks concurrently with a limit
//
// The HTTP client comes from registry::Options, so link checks honour the
// same proxy, timeout and user agent as registry requests.
// =============================================================================

use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::registry::Options;

/// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 5;

// Represents the status of a link after checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "target", rename_all = "snake_case")]
pub enum LinkStatus {
    /// Link is working (2xx)
    Ok,
    /// Link redirects to another URL (3xx that was not followed)
    Redirect(String),
    /// Link is broken (404, 410)
    Broken,
    /// Request timed out
    Timeout,
    /// SSL/TLS certificate error
    SslError,
    /// Too many redirects (redirect loop)
    TooManyRedirects,
    /// Could not resolve hostname
    DnsError,
    /// Other error
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCheckResult {
    pub url: String,
    #[serde(flatten)]
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LinkCheckResult {
    /// Ok and Redirect both count as alive
    pub fn is_ok(&self) -> bool {
        matches!(self.status, LinkStatus::Ok | LinkStatus::Redirect(_))
    }
}

/// Checks multiple links, at most `concurrency` at a time.
///
/// Results come back in completion order, not input order.
pub async fn check_links(
    urls: Vec<String>,
    options: &Options,
    concurrency: usize,
) -> Result<Vec<LinkCheckResult>> {
    let client = options
        .client_builder()?
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(Error::Client)?;

    let futures = urls.into_iter().map(|url| {
        let client = client.clone();
        async move { check_single_link(client, url).await }
    });

    Ok(stream::iter(futures)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await)
}

async fn check_single_link(client: Client, url: String) -> LinkCheckResult {
    debug!(%url, "checking link");

    let response = match client.head(&url).send().await {
        Ok(response)
            if matches!(
                response.status(),
                StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
            ) =>
        {
            client.get(&url).send().await
        }
        other => other,
    };

    match response {
        Ok(response) => analyze_response(url, &response),
        Err(e) => categorize_error(url, e),
    }
}

// HTTP status codes:
// - 200-299: Success
// - 300-399: Redirect
// - 404/410: Broken
// - anything else: Error
fn analyze_response(url: String, response: &reqwest::Response) -> LinkCheckResult {
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok());
    classify_status(url, response.status(), location)
}

fn classify_status(
    url: String,
    status_code: StatusCode,
    location: Option<&str>,
) -> LinkCheckResult {
    let code = status_code.as_u16();

    if status_code.is_success() {
        LinkCheckResult {
            url,
            status: LinkStatus::Ok,
            message: Some(format!("HTTP {}", code)),
        }
    } else if status_code.is_redirection() {
        let target = location.unwrap_or("unknown").to_string();
        LinkCheckResult {
            url,
            message: Some(format!("HTTP {} -> {}", code, target)),
            status: LinkStatus::Redirect(target),
        }
    } else if matches!(status_code, StatusCode::NOT_FOUND | StatusCode::GONE) {
        LinkCheckResult {
            url,
            status: LinkStatus::Broken,
            message: Some(format!("HTTP {}", code)),
        }
    } else {
        LinkCheckResult {
            url,
            status: LinkStatus::Error,
            message: Some(format!("HTTP {}", code)),
        }
    }
}

fn categorize_error(url: String, error: reqwest::Error) -> LinkCheckResult {
    let error_string = error.to_string().to_lowercase();

    let (status, message) = if error.is_timeout() {
        (LinkStatus::Timeout, "Request timed out".to_string())
    } else if error.is_redirect() {
        (LinkStatus::TooManyRedirects, "Too many redirects".to_string())
    } else if error.is_connect() {
        if error_string.contains("dns") {
            (LinkStatus::DnsError, "Could not resolve hostname".to_string())
        } else {
            (LinkStatus::Error, "Connection failed".to_string())
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        (LinkStatus::SslError, "SSL certificate error".to_string())
    } else {
        (LinkStatus::Error, error.to_string())
    };

    LinkCheckResult {
        url,
        status,
        message: Some(message),
    }
}
