// src/site/pages.rs
// =============================================================================
// "Does every link have a page?"
//
// Internal links map to markdown files under the docs directory the way
// the site generator maps them:
//
//   /                    -> index.md
//   /api/                -> api/index.md
//   /getting-started     -> getting-started.md
//   /examples/basic.html -> examples/basic.md
//
// Query strings and #fragments are ignored. Links inside the markdown pages
// are checked the same way; relative ones are resolved against the page's
// own URL, like a browser would.
// =============================================================================

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use super::config::SiteConfig;
use super::validate::{internal_links, Issue};
use crate::checker::{extract_internal_links, is_http_link};
use crate::error::{Error, Result};

// Placeholder origin used only to resolve relative paths
const PAGE_ORIGIN: &str = "http://docs.invalid";

/// Markdown file a site link should be backed by
pub fn page_path(docs_dir: &Path, link: &str) -> PathBuf {
    let path = link
        .split(['#', '?'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('/');

    let relative = if path.is_empty() || path.ends_with('/') {
        format!("{}index.md", path)
    } else if path.ends_with(".md") {
        path.to_string()
    } else if let Some(stem) = path.strip_suffix(".html") {
        format!("{}.md", stem)
    } else {
        format!("{}.md", path)
    };

    docs_dir.join(relative)
}

/// Site URL path of a markdown file relative to the docs directory
fn page_url(relative: &Path) -> String {
    let mut url = String::from("/");
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    url.push_str(&parts.join("/"));

    if let Some(dir) = url.strip_suffix("index.md") {
        dir.to_string()
    } else if let Some(stem) = url.strip_suffix(".md") {
        stem.to_string()
    } else {
        url
    }
}

/// Resolves a link found on the page at `page` (a site URL path) to an
/// absolute, percent-decoded site path. Returns None for links that cannot
/// be resolved.
fn resolve_from_page(page: &str, link: &str) -> Option<String> {
    let path = if link.starts_with('/') {
        link.to_string()
    } else {
        // Url::join percent-encodes the path; file names on disk are not
        let base = Url::parse(PAGE_ORIGIN).ok()?.join(page).ok()?;
        base.join(link).ok()?.path().to_string()
    };
    urlencoding::decode(&path).ok().map(|decoded| decoded.into_owned())
}

/// All markdown files under `docs_dir`, skipping hidden directories
/// (such as the generator's own config dir) and node_modules.
pub fn markdown_pages(docs_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    collect_markdown(docs_dir, &mut pages)?;
    pages.sort();
    Ok(pages)
}

fn collect_markdown(dir: &Path, pages: &mut Vec<PathBuf>) -> Result<()> {
    let io_err = |source| Error::Io {
        path: dir.display().to_string(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if path.is_dir() {
            if !name.starts_with('.') && name != "node_modules" {
                collect_markdown(&path, pages)?;
            }
        } else if name.ends_with(".md") {
            pages.push(path);
        }
    }
    Ok(())
}

/// Checks that every internal link in the configuration and in the
/// markdown pages has a backing page under `docs_dir`.
pub fn check_pages(config: &SiteConfig, docs_dir: &Path) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for (key, locale) in config.locale_blocks() {
        let mut checked = BTreeSet::new();
        for link in internal_links(&locale.theme_config) {
            if !checked.insert(link.to_string()) {
                continue;
            }
            let expected = page_path(docs_dir, link);
            debug!(%link, page = %expected.display(), "checking config link");
            if !expected.is_file() {
                issues.push(Issue::error(
                    Some(&key),
                    format!("no page for link '{}' (expected {})", link, expected.display()),
                ));
            }
        }
    }

    for page in markdown_pages(docs_dir)? {
        let relative = page.strip_prefix(docs_dir).unwrap_or(&page);
        let text = std::fs::read_to_string(&page).map_err(|source| Error::Io {
            path: page.display().to_string(),
            source,
        })?;
        let url = page_url(relative);

        for link in extract_internal_links(&text) {
            let Some(target) = resolve_from_page(&url, &link) else {
                issues.push(Issue::error(
                    None,
                    format!("{}: cannot resolve link '{}'", relative.display(), link),
                ));
                continue;
            };
            let expected = page_path(docs_dir, &target);
            if !expected.is_file() {
                issues.push(Issue::error(
                    None,
                    format!(
                        "{}: no page for link '{}' (expected {})",
                        relative.display(),
                        link,
                        expected.display()
                    ),
                ));
            }
        }
    }

    Ok(issues)
}

/// External URLs referenced by the configuration (nav, social links,
/// logo), deduplicated and sorted.
pub fn external_links(config: &SiteConfig) -> Vec<String> {
    let mut links = BTreeSet::new();

    for (_, locale) in config.locale_blocks() {
        let theme = &locale.theme_config;
        let nav = theme.nav.iter().map(|item| item.link.as_str());
        let sidebar = theme
            .sidebar
            .values()
            .flatten()
            .flat_map(|group| group.items.iter())
            .map(|item| item.link.as_str());
        let social = theme.social_links.iter().map(|s| s.link.as_str());
        let logo = theme.logo.as_deref();

        for link in nav.chain(sidebar).chain(social).chain(logo) {
            if is_http_link(link) {
                links.insert(link.to_string());
            }
        }
    }

    links.into_iter().collect()
}
