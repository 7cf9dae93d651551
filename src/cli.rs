// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate
// (derive API).
//
// Global flags (--registry, --mirror, --proxy, ...) apply to every
// subcommand and override values from the config file.
// =============================================================================

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use npm_crawler::registry::DEFAULT_SEARCH_LIMIT;
use npm_crawler::settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "npm-crawler",
    version,
    about = "Query the NPM registry and its mirrors",
    long_about = "npm-crawler fetches package metadata, versions, search results and download \
                  statistics from the NPM registry or one of its mirrors, optionally through a \
                  proxy. It can also walk a package's dependency graph and check the project's \
                  documentation site configuration."
)]
pub struct Cli {
    /// Config file (TOML). Defaults to ./npm-crawler.toml when present
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Registry base URL, e.g. https://registry.npmmirror.com
    #[arg(long, global = true, value_name = "URL", conflicts_with = "mirror")]
    pub registry: Option<String>,

    /// Well-known mirror: npm, yarn, cnpm, taobao, npmjs-com, tencent,
    /// npm-mirror, huawei-cloud
    #[arg(long, global = true, value_name = "NAME")]
    pub mirror: Option<String>,

    /// Proxy URL (http://, https:// or socks5://)
    #[arg(long, global = true, value_name = "URL")]
    pub proxy: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// More log output (-v info, -vv debug). NPM_CRAWLER_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a package's metadata
    ///
    /// Example: npm-crawler info react
    Info {
        /// Package name, e.g. react or @types/node
        package: String,

        /// Print the full package document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one version of a package
    ///
    /// Example: npm-crawler version lodash 4.17.21
    Version {
        package: String,

        /// Exact version or dist-tag (latest, next, ...)
        #[arg(value_name = "VERSION")]
        version_or_tag: String,

        #[arg(long)]
        json: bool,
    },

    /// Search the registry
    ///
    /// Example: npm-crawler search "http client" --limit 5
    Search {
        text: String,

        /// Maximum number of results (0 = default, capped at 250)
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Show download counts
    ///
    /// Example: npm-crawler downloads express --period last-month --daily
    Downloads {
        package: String,

        /// last-day, last-week, last-month, last-year, YYYY-MM-DD or
        /// YYYY-MM-DD:YYYY-MM-DD
        #[arg(long, default_value = "last-week")]
        period: String,

        /// Break the total down per day
        #[arg(long)]
        daily: bool,

        #[arg(long)]
        json: bool,
    },

    /// Show the registry's status document
    Status {
        #[arg(long)]
        json: bool,
    },

    /// Check which well-known mirrors are reachable
    Mirrors {
        #[arg(long)]
        json: bool,
    },

    /// Walk a package's dependency graph breadth-first
    ///
    /// Example: npm-crawler crawl express --max-depth 3
    Crawl {
        package: String,

        /// 1 = only the package itself
        #[arg(long, default_value_t = 2)]
        max_depth: usize,

        /// Packages fetched in parallel
        #[arg(long)]
        concurrency: Option<usize>,

        /// Also follow the root package's devDependencies
        #[arg(long)]
        dev: bool,

        #[arg(long)]
        json: bool,
    },

    /// Validate the documentation site configuration and its pages
    ///
    /// Example: npm-crawler site --file docs/site.json --external
    Site {
        /// Site configuration (JSON or TOML)
        #[arg(long, default_value = "docs/site.json")]
        file: PathBuf,

        /// Docs directory; defaults to the directory of --file
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Also check external links over HTTP
        #[arg(long)]
        external: bool,

        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Global flags as a Settings layer to merge over the config file
    pub fn flag_settings(&self) -> Settings {
        Settings {
            registry: self.registry.clone(),
            mirror: self.mirror.clone(),
            proxy: self.proxy.clone(),
            timeout_secs: self.timeout,
            ..Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["npm-crawler", "info", "react", "--mirror", "yarn", "-vv"]);
        assert_eq!(cli.mirror.as_deref(), Some("yarn"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Info { ref package, json: false } if package == "react"
        ));
    }

    #[test]
    fn test_registry_conflicts_with_mirror() {
        let result = Cli::try_parse_from([
            "npm-crawler",
            "--registry",
            "http://localhost:4873",
            "--mirror",
            "yarn",
            "status",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["npm-crawler", "downloads", "express"]);
        match cli.command {
            Commands::Downloads { period, daily, .. } => {
                assert_eq!(period, "last-week");
                assert!(!daily);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::parse_from(["npm-crawler", "site"]);
        match cli.command {
            Commands::Site { file, docs, .. } => {
                assert_eq!(file, PathBuf::from("docs/site.json"));
                assert!(docs.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_flag_settings() {
        let cli = Cli::parse_from([
            "npm-crawler",
            "--proxy",
            "socks5://127.0.0.1:1080",
            "--timeout",
            "5",
            "status",
        ]);
        let settings = cli.flag_settings();
        assert_eq!(settings.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(settings.timeout_secs, Some(5));
        assert!(settings.registry.is_none());
    }
}
