// src/settings.rs
// =============================================================================
// Optional TOML config file, merged with command-line flags.
//
// Example npm-crawler.toml:
//
//     mirror = "npm-mirror"
//     proxy = "http://127.0.0.1:8080"
//     timeout_secs = 15
//     concurrency = 16
//
// Precedence: flag > file > built-in default. When both `registry` and
// `mirror` are given, `registry` wins.
// =============================================================================

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::registry::{Mirror, Options};

/// Looked up in the working directory when --config is not given
pub const DEFAULT_CONFIG_FILE: &str = "npm-crawler.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub registry: Option<String>,
    pub mirror: Option<String>,
    pub proxy: Option<String>,
    pub downloads_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    /// Parallel requests for crawl and link checks
    pub concurrency: Option<usize>,
}

impl Settings {
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Settings> {
        toml::from_str(text).map_err(|e| Error::Config {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Settings> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Loads `explicit` if given (it must exist), otherwise the default
    /// file if present, otherwise empty settings.
    pub fn discover(explicit: Option<&Path>) -> Result<Settings> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(&default)
                } else {
                    Ok(Settings::default())
                }
            }
        }
    }

    /// Overlays `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: Settings) -> Settings {
        // An explicit registry in `other` beats a mirror in `self` and
        // vice versa
        let (registry, mirror) = if other.registry.is_some() {
            (other.registry, None)
        } else if other.mirror.is_some() {
            (None, other.mirror)
        } else {
            (self.registry, self.mirror)
        };

        Settings {
            registry,
            mirror,
            proxy: other.proxy.or(self.proxy),
            downloads_url: other.downloads_url.or(self.downloads_url),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            user_agent: other.user_agent.or(self.user_agent),
            concurrency: other.concurrency.or(self.concurrency),
        }
    }

    /// Registry options described by these settings
    pub fn to_options(&self) -> Result<Options> {
        let mut options = Options::new();

        if let Some(registry) = &self.registry {
            options = options.registry_url(registry.as_str());
        } else if let Some(mirror) = &self.mirror {
            let mirror: Mirror = mirror.parse()?;
            options = options.registry_url(mirror.url());
        }
        if let Some(proxy) = &self.proxy {
            options = options.proxy(proxy.as_str());
        }
        if let Some(url) = &self.downloads_url {
            options = options.downloads_url(url.as_str());
        }
        if let Some(secs) = self.timeout_secs {
            options = options.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &self.user_agent {
            options = options.user_agent(agent.as_str());
        }

        Ok(options)
    }

    pub fn concurrency_or(&self, default: usize) -> usize {
        self.concurrency.filter(|n| *n > 0).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DEFAULT_REGISTRY_URL, REGISTRY_URL_NPM_MIRROR};

    #[test]
    fn test_parse_file() {
        let settings = Settings::from_toml_str(
            r#"
mirror = "npm-mirror"
proxy = "http://127.0.0.1:8080"
timeout_secs = 15
concurrency = 16
"#,
            "test",
        )
        .unwrap();

        let options = settings.to_options().unwrap();
        assert_eq!(options.registry_url, REGISTRY_URL_NPM_MIRROR);
        assert_eq!(options.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(options.timeout, Duration::from_secs(15));
        assert_eq!(settings.concurrency_or(4), 16);
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let err = Settings::from_toml_str("registy = \"typo\"", "npm-crawler.toml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_unknown_mirror_is_an_error() {
        let settings = Settings {
            mirror: Some("nowhere".to_string()),
            ..Settings::default()
        };
        assert!(matches!(settings.to_options(), Err(Error::UnknownMirror(_))));
    }

    #[test]
    fn test_flags_override_file() {
        let file = Settings {
            mirror: Some("yarn".to_string()),
            proxy: Some("http://file-proxy:8080".to_string()),
            timeout_secs: Some(10),
            ..Settings::default()
        };
        let flags = Settings {
            registry: Some("http://localhost:4873".to_string()),
            timeout_secs: Some(5),
            ..Settings::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.registry.as_deref(), Some("http://localhost:4873"));
        assert!(merged.mirror.is_none());
        assert_eq!(merged.proxy.as_deref(), Some("http://file-proxy:8080"));
        assert_eq!(merged.timeout_secs, Some(5));
    }

    #[test]
    fn test_registry_beats_mirror_in_one_source() {
        let settings = Settings {
            registry: Some("http://localhost:4873".to_string()),
            mirror: Some("yarn".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.to_options().unwrap().registry_url, "http://localhost:4873");
    }

    #[test]
    fn test_empty_settings_are_defaults() {
        let options = Settings::default().to_options().unwrap();
        assert_eq!(options.registry_url, DEFAULT_REGISTRY_URL);
        assert_eq!(Settings::default().concurrency_or(8), 8);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Settings::discover(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
