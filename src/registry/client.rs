// src/registry/client.rs
// =============================================================================
// The registry client.
//
// Every endpoint is a plain GET that returns JSON, so all of them funnel
// through `get_json`, which owns the status-code handling:
//   - 2xx      -> decode the body
//   - 404      -> Error::NotFound (package or version does not exist)
//   - other    -> Error::Status
//
// One reqwest Client is built per Registry and reused for every request
// (connection pooling). Registry is cheap to clone, so it can be handed to
// spawned tasks the same way the link checker hands out its client.
// =============================================================================

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::mirror::Mirror;
use super::options::Options;
use crate::error::{Error, Result};
use crate::models::{
    DownloadRangeStats, DownloadStats, Package, Period, RegistryInformation, SearchResult, Version,
};

/// Search page size used when the caller passes 0
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Largest page the search endpoint serves
pub const MAX_SEARCH_LIMIT: usize = 250;

#[derive(Debug, Clone)]
pub struct Registry {
    options: Options,
    client: Client,
}

impl Registry {
    /// Creates a client. Fails only if the options carry an unusable proxy.
    pub fn new(options: Options) -> Result<Self> {
        let client = options.http_client()?;
        Ok(Registry { options, client })
    }

    /// Client for the official registry with default settings
    pub fn with_defaults() -> Result<Self> {
        Self::new(Options::new())
    }

    pub fn for_mirror(mirror: Mirror) -> Result<Self> {
        Self::new(Options::for_mirror(mirror))
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Status document of the registry (GET /)
    pub async fn registry_information(&self) -> Result<RegistryInformation> {
        let url = format!("{}/", self.options.registry_url);
        self.get_json(url).await
    }

    /// Full packument of a package, every version included
    pub async fn package_information(&self, name: &str) -> Result<Package> {
        let url = format!("{}/{}", self.options.registry_url, encode_package_name(name)?);
        self.get_json(url).await
    }

    /// Manifest of one version. `version` may also be a dist-tag such as
    /// `latest`; the registry resolves it.
    pub async fn package_version(&self, name: &str, version: &str) -> Result<Version> {
        let name = encode_package_name(name)?;
        let version = version.trim();
        let url = format!("{}/{}/{}", self.options.registry_url, name, version);

        // No published version or tag can contain these; sending `1.0.0#x`
        // would fetch 1.0.0 instead
        let impossible = version.is_empty()
            || version
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'));
        if impossible {
            return Err(Error::NotFound { url });
        }
        self.get_json(url).await
    }

    /// Full-text search. `limit` of 0 means the default page size; limits
    /// above the registry maximum are clamped.
    pub async fn search_packages(&self, text: &str, limit: usize) -> Result<SearchResult> {
        let size = effective_search_limit(limit);
        let base = format!("{}/-/v1/search", self.options.registry_url);
        let url = Url::parse_with_params(&base, &[("text", text), ("size", &size.to_string())])
            .map_err(|source| Error::InvalidUrl { url: base, source })?;
        self.get_json(url.to_string()).await
    }

    /// Total downloads of a package over `period`
    pub async fn download_stats(&self, name: &str, period: &str) -> Result<DownloadStats> {
        let period: Period = period.parse()?;
        let url = format!(
            "{}/downloads/point/{}/{}",
            self.options.downloads_url,
            period,
            downloads_package_name(name)?
        );
        self.get_json(url).await
    }

    /// Per-day downloads of a package over `period`
    pub async fn download_range(&self, name: &str, period: &str) -> Result<DownloadRangeStats> {
        let period: Period = period.parse()?;
        let url = format!(
            "{}/downloads/range/{}/{}",
            self.options.downloads_url,
            period,
            downloads_package_name(name)?
        );
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        debug!(%url, "GET");

        let response = match self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(source) => return Err(Error::Http { url, source }),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound { url });
        }
        if !status.is_success() {
            return Err(Error::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) => return Err(Error::Http { url, source }),
        };

        serde_json::from_slice(&body).map_err(|source| Error::Decode { url, source })
    }
}

pub(crate) fn effective_search_limit(limit: usize) -> usize {
    match limit {
        0 => DEFAULT_SEARCH_LIMIT,
        n => n.min(MAX_SEARCH_LIMIT),
    }
}

/// Path segment for a package name. Scoped names keep their `@` but the
/// slash is escaped, which is what the registry expects: `@types%2Fnode`.
pub(crate) fn encode_package_name(name: &str) -> Result<String> {
    let name = validate_package_name(name)?;
    Ok(name.replace('/', "%2F"))
}

/// The downloads API takes scoped names unescaped
fn downloads_package_name(name: &str) -> Result<&str> {
    validate_package_name(name)
}

fn validate_package_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed.chars().any(|c| c.is_whitespace() || c == '?' || c == '#')
        || trimmed.matches('/').count() > usize::from(trimmed.starts_with('@'))
        || (trimmed.starts_with('@') && !trimmed.contains('/'));

    if invalid {
        return Err(Error::InvalidPackageName(name.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain_and_scoped_names() {
        assert_eq!(encode_package_name("react").unwrap(), "react");
        assert_eq!(encode_package_name("@types/node").unwrap(), "@types%2Fnode");
    }

    #[test]
    fn test_reject_bad_names() {
        for bad in ["", "   ", "a b", "a/b", "@scope", "@a/b/c", "x?y"] {
            assert!(
                matches!(encode_package_name(bad), Err(Error::InvalidPackageName(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_search_limit() {
        assert_eq!(effective_search_limit(0), DEFAULT_SEARCH_LIMIT);
        assert_eq!(effective_search_limit(5), 5);
        assert_eq!(effective_search_limit(10_000), MAX_SEARCH_LIMIT);
    }

    #[test]
    fn test_registry_keeps_options() {
        let options = Options::new()
            .registry_url("https://test-usage.example.com")
            .proxy("http://test-proxy.example.com");
        let registry = Registry::new(options.clone()).unwrap();
        assert_eq!(registry.options(), &options);
    }

    #[test]
    fn test_registry_rejects_bad_proxy() {
        let options = Options::new().proxy("://invalid-url");
        assert!(matches!(Registry::new(options), Err(Error::InvalidProxy { .. })));
    }

    #[test]
    fn test_every_mirror_builds() {
        for mirror in Mirror::ALL {
            let registry = Registry::for_mirror(mirror).unwrap();
            assert_eq!(registry.options().registry_url, mirror.url());
        }
    }

    #[tokio::test]
    async fn test_invalid_period_fails_before_request() {
        // Unroutable address: reaching the network would produce Error::Http
        let registry = Registry::new(Options::new().downloads_url("http://127.0.0.1:9")).unwrap();
        let err = registry.download_stats("react", "invalid-period").await.unwrap_err();
        assert!(matches!(err, Error::InvalidPeriod(_)));
    }

    #[tokio::test]
    async fn test_version_lookup_checks_the_name_first() {
        let registry = Registry::new(Options::new().registry_url("http://127.0.0.1:9")).unwrap();
        let err = registry.package_version("", "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidPackageName(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_impossible_versions_fail_before_request() {
        let registry = Registry::new(Options::new().registry_url("http://127.0.0.1:9")).unwrap();
        for version in ["", "  ", "4.17.21#x", "4.17.21?x", "4.17/21", "4.17 21"] {
            let err = registry.package_version("lodash", version).await.unwrap_err();
            assert!(err.is_not_found(), "{:?} gave {:?}", version, err);
        }
    }
}
