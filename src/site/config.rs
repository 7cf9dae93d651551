// src/site/config.rs
// =============================================================================
// The documentation site's configuration tree, as data.
//
// Field names follow the static-site generator's schema (camelCase keys:
// themeConfig, socialLinks, editLink, ...). The tree is loaded once from
// docs/site.json (or a .toml file with the same keys) and never mutated.
//
// Most fields are defaulted: a missing `title` should show up as a readable
// validation issue, not as a serde error pointing at a column. Two things
// are rejected at load time because they would otherwise vanish silently:
// unknown keys (a misspelled `editLnk` would just be dropped) and a
// duplicated locale key (a JSON map keeps only the last one).
// =============================================================================

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Key of the locale served at the site root
pub const ROOT_LOCALE: &str = "root";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SiteConfig {
    pub base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Theme for single-locale sites that don't use `locales`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_config: Option<ThemeConfig>,
    #[serde(deserialize_with = "unique_locales", skip_serializing_if = "BTreeMap::is_empty")]
    pub locales: BTreeMap<String, LocaleConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<MarkdownConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            base: "/".to_string(),
            title: None,
            description: None,
            lang: None,
            theme_config: None,
            locales: BTreeMap::new(),
            markdown: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct LocaleConfig {
    pub label: String,
    pub lang: String,
    pub title: String,
    pub description: String,
    /// Explicit URL of the locale; defaults to its base path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub theme_config: ThemeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub nav: Vec<NavItem>,
    /// Root path -> groups shown for pages under that path
    pub sidebar: BTreeMap<String, Vec<SidebarGroup>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub social_links: Vec<SocialLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<EditLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<LastUpdated>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_footer: Option<DocFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_to_top_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_menu_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode_switch_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_mode_switch_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode_switch_title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavItem {
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarGroup {
    pub text: String,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialLink {
    pub icon: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Footer {
    pub message: String,
    pub copyright: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditLink {
    /// URL with a `:path` placeholder for the page's source file
    pub pattern: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct LastUpdated {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_options: Option<FormatOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct FormatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocFooter {
    pub prev: String,
    pub next: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Outline {
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct MarkdownConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<MarkdownTheme>,
    pub line_numbers: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownTheme {
    pub light: String,
    pub dark: String,
}

impl SiteConfig {
    /// Loads a config file; `.toml` is read as TOML, anything else as JSON.
    pub fn load(path: &Path) -> Result<SiteConfig> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        let parsed = if is_toml {
            toml::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| Error::Config {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn from_json_str(json: &str) -> Result<SiteConfig> {
        serde_json::from_str(json).map_err(|e| Error::Config {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_json_string(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Locale blocks with their keys. A single-locale site (top-level
    /// `themeConfig`, no `locales`) is presented as one `root` block.
    pub fn locale_blocks(&self) -> Vec<(String, LocaleConfig)> {
        if !self.locales.is_empty() {
            return self
                .locales
                .iter()
                .map(|(key, locale)| (key.clone(), locale.clone()))
                .collect();
        }

        match &self.theme_config {
            Some(theme) => vec![(
                ROOT_LOCALE.to_string(),
                LocaleConfig {
                    label: self.lang.clone().unwrap_or_default(),
                    lang: self.lang.clone().unwrap_or_default(),
                    title: self.title.clone().unwrap_or_default(),
                    description: self.description.clone().unwrap_or_default(),
                    link: None,
                    theme_config: theme.clone(),
                },
            )],
            None => Vec::new(),
        }
    }
}

/// URL prefix a locale owns: `/` for root, `/<key>/` otherwise
pub fn locale_base_path(key: &str) -> String {
    if key == ROOT_LOCALE {
        "/".to_string()
    } else {
        format!("/{}/", key.trim_matches('/'))
    }
}

fn unique_locales<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, LocaleConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueKeys;

    impl<'de> Visitor<'de> for UniqueKeys {
        type Value = BTreeMap<String, LocaleConfig>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of locale key to locale block")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut map: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut locales = BTreeMap::new();
            while let Some((key, locale)) = map.next_entry::<String, LocaleConfig>()? {
                if locales.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate locale key '{}'", key)));
                }
                locales.insert(key, locale);
            }
            Ok(locales)
        }
    }

    deserializer.deserialize_map(UniqueKeys)
}
