// src/site/validate.rs
// =============================================================================
// Structural checks on a loaded SiteConfig.
//
// Nothing here touches the filesystem or the network; see pages.rs for
// "does this link have a page" and checker::check_links for external URLs.
//
// Rules:
// - base starts and ends with '/'
// - every locale has label, lang, title, description, nav and sidebar
// - lang codes are unique
// - sidebar keys and internal links belong to the locale declaring them
// - editLink.pattern has a :path placeholder
// - locales agree on footer, edit pattern, social links and logo, and have
//   the same nav / sidebar shape (they are translations of one another)
// =============================================================================

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::config::{locale_base_path, LocaleConfig, SiteConfig, ThemeConfig, ROOT_LOCALE};
use crate::checker::is_internal_link;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Locale key the issue was found in; None for site-wide issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub message: String,
}

impl Issue {
    pub fn error(locale: Option<&str>, message: impl Into<String>) -> Self {
        Issue {
            severity: Severity::Error,
            locale: locale.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn warning(locale: Option<&str>, message: impl Into<String>) -> Self {
        Issue {
            severity: Severity::Warning,
            locale: locale.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.locale {
            Some(locale) => write!(f, "{} [{}]: {}", level, locale, self.message),
            None => write!(f, "{}: {}", level, self.message),
        }
    }
}

/// Runs every structural rule and returns what it found, errors first.
pub fn validate(config: &SiteConfig) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !config.base.starts_with('/') || !config.base.ends_with('/') {
        issues.push(Issue::error(
            None,
            format!("base '{}' must start and end with '/'", config.base),
        ));
    }

    let blocks = config.locale_blocks();
    if blocks.is_empty() {
        issues.push(Issue::error(None, "no locales and no themeConfig defined"));
        return issues;
    }

    let base_paths: BTreeMap<String, String> = blocks
        .iter()
        .map(|(key, _)| (key.clone(), locale_base_path(key)))
        .collect();

    let mut langs: HashSet<&str> = HashSet::new();
    for (key, locale) in &blocks {
        check_required_fields(key, locale, &mut issues);

        if !locale.lang.is_empty() && !langs.insert(locale.lang.as_str()) {
            issues.push(Issue::error(
                Some(key),
                format!("lang '{}' is used by more than one locale", locale.lang),
            ));
        }

        if let Some(link) = &locale.link {
            if link != &base_paths[key] {
                issues.push(Issue::warning(
                    Some(key),
                    format!("link '{}' differs from the locale path '{}'", link, base_paths[key]),
                ));
            }
        }

        check_ownership(key, &locale.theme_config, &base_paths, &mut issues);
        check_theme(key, &locale.theme_config, &mut issues);
    }

    check_drift(&blocks, &mut issues);

    issues.sort_by_key(|issue| issue.severity);
    issues
}

fn check_required_fields(key: &str, locale: &LocaleConfig, issues: &mut Vec<Issue>) {
    let fields = [
        ("label", &locale.label),
        ("lang", &locale.lang),
        ("title", &locale.title),
        ("description", &locale.description),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            issues.push(Issue::error(Some(key), format!("missing {}", name)));
        }
    }

    if locale.theme_config.nav.is_empty() {
        issues.push(Issue::error(Some(key), "themeConfig.nav is empty"));
    }
    if locale.theme_config.sidebar.is_empty() {
        issues.push(Issue::error(Some(key), "themeConfig.sidebar is empty"));
    }
}

/// Locale that owns `path`: the one with the longest matching base path
fn owner_of<'a>(path: &str, base_paths: &'a BTreeMap<String, String>) -> Option<&'a str> {
    base_paths
        .iter()
        .filter(|(_, base)| path.starts_with(base.as_str()) || format!("{}/", path) == **base)
        .max_by_key(|(_, base)| base.len())
        .map(|(key, _)| key.as_str())
}

fn check_ownership(
    key: &str,
    theme: &ThemeConfig,
    base_paths: &BTreeMap<String, String>,
    issues: &mut Vec<Issue>,
) {
    // A site without a root locale leaves "/" unowned; nothing to compare
    let single_root = base_paths.len() == 1 && base_paths.contains_key(ROOT_LOCALE);

    for sidebar_key in theme.sidebar.keys() {
        if !sidebar_key.starts_with('/') {
            issues.push(Issue::error(
                Some(key),
                format!("sidebar key '{}' must start with '/'", sidebar_key),
            ));
            continue;
        }
        if single_root {
            continue;
        }
        match owner_of(sidebar_key, base_paths) {
            Some(owner) if owner == key => {}
            Some(owner) => issues.push(Issue::error(
                Some(key),
                format!("sidebar key '{}' belongs to locale '{}'", sidebar_key, owner),
            )),
            None => issues.push(Issue::error(
                Some(key),
                format!("sidebar key '{}' is outside every locale path", sidebar_key),
            )),
        }
    }

    if single_root {
        return;
    }

    for link in internal_links(theme) {
        if !link.starts_with('/') {
            continue;
        }
        match owner_of(link, base_paths) {
            Some(owner) if owner == key => {}
            Some(owner) => issues.push(Issue::error(
                Some(key),
                format!("link '{}' points into locale '{}'", link, owner),
            )),
            None => issues.push(Issue::error(
                Some(key),
                format!("link '{}' is outside every locale path", link),
            )),
        }
    }
}

fn check_theme(key: &str, theme: &ThemeConfig, issues: &mut Vec<Issue>) {
    for item in &theme.nav {
        if item.text.trim().is_empty() {
            issues.push(Issue::error(Some(key), format!("nav entry '{}' has no text", item.link)));
        }
        if item.link.trim().is_empty() {
            issues.push(Issue::error(Some(key), format!("nav entry '{}' has no link", item.text)));
        }
    }

    for (root, groups) in &theme.sidebar {
        let mut seen = HashSet::new();
        for group in groups {
            if group.text.trim().is_empty() {
                issues.push(Issue::warning(
                    Some(key),
                    format!("sidebar group under '{}' has no heading", root),
                ));
            }
            if group.items.is_empty() {
                issues.push(Issue::warning(
                    Some(key),
                    format!("sidebar group '{}' has no items", group.text),
                ));
            }
            for item in &group.items {
                if item.link.trim().is_empty() {
                    issues.push(Issue::error(
                        Some(key),
                        format!("sidebar entry '{}' has no link", item.text),
                    ));
                } else if !seen.insert(item.link.as_str()) {
                    issues.push(Issue::warning(
                        Some(key),
                        format!("sidebar under '{}' lists '{}' more than once", root, item.link),
                    ));
                }
            }
        }
    }

    if let Some(edit) = &theme.edit_link {
        if !edit.pattern.contains(":path") {
            issues.push(Issue::error(
                Some(key),
                format!("editLink.pattern '{}' has no :path placeholder", edit.pattern),
            ));
        }
    }
}

/// Compares every locale against the reference locale (root when present)
fn check_drift(blocks: &[(String, LocaleConfig)], issues: &mut Vec<Issue>) {
    let reference = blocks
        .iter()
        .find(|(key, _)| key == ROOT_LOCALE)
        .or_else(|| blocks.first());
    let Some((ref_key, reference)) = reference else {
        return;
    };
    let ref_theme = &reference.theme_config;

    for (key, locale) in blocks {
        if key == ref_key {
            continue;
        }
        let theme = &locale.theme_config;
        let mut differs = |what: &str| {
            issues.push(Issue::error(
                Some(key),
                format!("{} differs from locale '{}'", what, ref_key),
            ));
        };

        if theme.footer != ref_theme.footer {
            differs("footer");
        }
        if edit_pattern(theme) != edit_pattern(ref_theme) {
            differs("editLink.pattern");
        }
        if theme.social_links != ref_theme.social_links {
            differs("socialLinks");
        }
        if theme.logo != ref_theme.logo {
            differs("logo");
        }
        if theme.nav.len() != ref_theme.nav.len() {
            differs("number of nav entries");
        }
        if sidebar_shape(theme) != sidebar_shape(ref_theme) {
            differs("sidebar structure");
        }
    }
}

fn edit_pattern(theme: &ThemeConfig) -> Option<&str> {
    theme.edit_link.as_ref().map(|e| e.pattern.as_str())
}

/// Items per group, in order, across all sidebar roots
fn sidebar_shape(theme: &ThemeConfig) -> Vec<usize> {
    theme
        .sidebar
        .values()
        .flat_map(|groups| groups.iter().map(|g| g.items.len()))
        .collect()
}

/// Internal nav and sidebar links of one theme block
pub(crate) fn internal_links(theme: &ThemeConfig) -> Vec<&str> {
    let nav = theme.nav.iter().map(|item| item.link.as_str());
    let sidebar = theme
        .sidebar
        .values()
        .flat_map(|groups| groups.iter())
        .flat_map(|group| group.items.iter())
        .map(|item| item.link.as_str());

    nav.chain(sidebar).filter(|link| is_internal_link(link)).collect()
}
