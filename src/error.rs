// src/error.rs
// =============================================================================
// Error type shared by everything in the library.
//
// The binary wraps these in anyhow for context; the library keeps them
// typed so callers can tell "package does not exist" apart from
// "registry is down".
// =============================================================================

use thiserror::Error;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (connect, timeout, TLS, ...)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered 404
    #[error("not found: {url}")]
    NotFound { url: String },

    /// The server answered with another non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body was not the JSON we expected
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid proxy URL '{proxy}': {reason}")]
    InvalidProxy { proxy: String, reason: String },

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Expected last-day, last-week, last-month, last-year, YYYY-MM-DD or
    /// YYYY-MM-DD:YYYY-MM-DD
    #[error("invalid download period '{0}' (try last-week, 2024-01-31 or start:end)")]
    InvalidPeriod(String),

    #[error("invalid package name '{0}'")]
    InvalidPackageName(String),

    #[error("unknown mirror '{0}'")]
    UnknownMirror(String),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {path}: {message}")]
    Config { path: String, message: String },
}

impl Error {
    /// True when the registry reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
