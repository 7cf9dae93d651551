// src/registry/options.rs
// =============================================================================
// Connection options for a Registry: which server, which proxy, how long
// to wait.
//
// Setters take `self` and return it so options can be built in one chain:
//
//     let options = Options::new()
//         .registry_url("https://registry.npmmirror.com")
//         .proxy("http://127.0.0.1:8080");
// =============================================================================

use reqwest::{Client, ClientBuilder, Proxy};
use std::time::Duration;
use url::Url;

use super::mirror::Mirror;
use crate::error::{Error, Result};

/// Official NPM registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Host of the download-count API (only the official one exists)
pub const DEFAULT_DOWNLOADS_URL: &str = "https://api.npmjs.org";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_USER_AGENT: &str = concat!("npm-crawler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Base URL of the registry, without trailing slash
    pub registry_url: String,
    /// Proxy URL; None sends requests directly
    pub proxy: Option<String>,
    /// Base URL of the downloads API
    pub downloads_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    pub fn new() -> Self {
        Options {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            proxy: None,
            downloads_url: DEFAULT_DOWNLOADS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Default options pointed at one of the well-known mirrors
    pub fn for_mirror(mirror: Mirror) -> Self {
        Self::new().registry_url(mirror.url())
    }

    pub fn registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = trim_trailing_slash(url.into());
        self
    }

    /// Sets the proxy. An empty string clears it.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        let proxy = proxy.into();
        self.proxy = if proxy.is_empty() { None } else { Some(proxy) };
        self
    }

    pub fn downloads_url(mut self, url: impl Into<String>) -> Self {
        self.downloads_url = trim_trailing_slash(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the HTTP client these options describe.
    pub fn http_client(&self) -> Result<Client> {
        self.client_builder()?.build().map_err(Error::Client)
    }

    /// Client builder with timeout, user agent and proxy applied, for
    /// callers that need extra settings on top.
    ///
    /// The proxy URL is validated up front so a typo surfaces as
    /// `Error::InvalidProxy` instead of a confusing connect error later.
    pub fn client_builder(&self) -> Result<ClientBuilder> {
        let mut builder = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone());

        if let Some(proxy_url) = &self.proxy {
            let parsed = Url::parse(proxy_url).map_err(|e| Error::InvalidProxy {
                proxy: proxy_url.clone(),
                reason: e.to_string(),
            })?;

            match parsed.scheme() {
                "http" | "https" | "socks5" | "socks5h" => {}
                other => {
                    return Err(Error::InvalidProxy {
                        proxy: proxy_url.clone(),
                        reason: format!("unsupported scheme '{}'", other),
                    })
                }
            }

            let proxy = Proxy::all(parsed.as_str()).map_err(|e| Error::InvalidProxy {
                proxy: proxy_url.clone(),
                reason: e.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }

        Ok(builder)
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::new();
        assert_eq!(options.registry_url, DEFAULT_REGISTRY_URL);
        assert_eq!(options.downloads_url, DEFAULT_DOWNLOADS_URL);
        assert!(options.proxy.is_none());
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_later_setters_win() {
        let options = Options::new()
            .registry_url("https://first-registry.com")
            .proxy("http://first-proxy.com")
            .registry_url("https://second-registry.com")
            .proxy("http://second-proxy.com");

        assert_eq!(options.registry_url, "https://second-registry.com");
        assert_eq!(options.proxy.as_deref(), Some("http://second-proxy.com"));
    }

    #[test]
    fn test_empty_proxy_clears() {
        let options = Options::new().proxy("http://proxy.example.com:3128").proxy("");
        assert!(options.proxy.is_none());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let options = Options::new().registry_url("http://localhost:8080/");
        assert_eq!(options.registry_url, "http://localhost:8080");
    }

    #[test]
    fn test_http_client_without_proxy() {
        assert!(Options::new().http_client().is_ok());
    }

    #[test]
    fn test_http_client_with_valid_proxies() {
        let http = Options::new().proxy("http://proxy.example.com:8080");
        assert!(http.http_client().is_ok());

        let socks = Options::new().proxy("socks5://127.0.0.1:1080");
        assert!(socks.http_client().is_ok());
    }

    #[test]
    fn test_http_client_rejects_bad_proxies() {
        let spaces = Options::new().proxy("http://proxy with spaces.com:8080");
        assert!(matches!(spaces.http_client(), Err(Error::InvalidProxy { .. })));

        let no_scheme = Options::new().proxy("://invalid-url");
        assert!(matches!(no_scheme.http_client(), Err(Error::InvalidProxy { .. })));

        let ftp = Options::new().proxy("ftp://proxy.example.com");
        assert!(matches!(ftp.http_client(), Err(Error::InvalidProxy { .. })));
    }

    #[test]
    fn test_for_mirror() {
        let options = Options::for_mirror(Mirror::Yarn);
        assert_eq!(options.registry_url, "https://registry.yarnpkg.com");
    }
}
