// src/checker/mod.rs
// =============================================================================
// Link checking used by the documentation-site checks.
//
// Submodules:
// - http: Makes HTTP requests to check if links are alive
// - markdown: Extracts links from markdown text
// =============================================================================

mod http;
mod markdown;

pub use http::{check_links, LinkCheckResult, LinkStatus};
pub use markdown::{extract_internal_links, extract_markdown_links};

pub(crate) use markdown::{is_http_link, is_internal_link};
