// src/checker/markdown.rs
// =============================================================================
// This module extracts links from Markdown text.
//
// We use the `pulldown-cmark` crate which parses Markdown into a stream of
// events (heading, paragraph, link, ...). A link shows up as
// Start(Link) / Text / End(Link); we only need the Start event because it
// carries the destination.
//
// Two flavours of link matter for the docs site:
// - external: http:// and https:// (checked over the network)
// - internal: /absolute or relative paths (checked against files on disk)
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};

/// All HTTP/HTTPS link destinations in `markdown`, in document order.
///
/// Example input:
///   "Check out [Rust](https://www.rust-lang.org)!"
///
/// Example output:
///   vec!["https://www.rust-lang.org"]
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    link_destinations(markdown)
        .into_iter()
        .filter(|url| is_http_link(url))
        .collect()
}

/// Links that point inside the site: `/guide`, `./basic`, `../api/`.
///
/// Anchors-only links (`#usage`), `mailto:` and every other scheme are
/// skipped.
pub fn extract_internal_links(markdown: &str) -> Vec<String> {
    link_destinations(markdown)
        .into_iter()
        .filter(|url| is_internal_link(url))
        .collect()
}

fn link_destinations(markdown: &str) -> Vec<String> {
    Parser::new(markdown)
        .filter_map(|event| match event {
            // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title)
            Event::Start(Tag::Link(_link_type, dest_url, _title)) => Some(dest_url.to_string()),
            _ => None,
        })
        .collect()
}

pub(crate) fn is_http_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

pub(crate) fn is_internal_link(url: &str) -> bool {
    if url.is_empty() || url.starts_with('#') || url.starts_with("//") {
        return false;
    }
    // Anything with a scheme (mailto:, tel:, https:) is not a page
    match url.find(':') {
        Some(colon) => url[..colon].contains('/'),
        None => true,
    }
}
