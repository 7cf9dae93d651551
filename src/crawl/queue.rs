// src/crawl/queue.rs
// =============================================================================
// Breadth-first walk over a package's dependency graph.
//
// How it works:
// 1. Start with the root package in a queue at depth 1
// 2. Take every queued package of the current depth as one batch
// 3. Fetch the batch concurrently (bounded by `concurrency`)
// 4. Read each package's `latest` manifest and queue its dependencies at
//    depth + 1, unless already seen or past `max_depth`
// 5. Pause for `delay`, then repeat with the next depth
//
// Every package is fetched at most once, no matter how many packages
// depend on it. A package that fails to load is recorded and skipped;
// only a failure of the root package aborts the walk.
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::Package;
use crate::registry::Registry;

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// 1 = just the root package
    pub max_depth: usize,
    /// Packages fetched at once within a level
    pub concurrency: usize,
    /// Follow the root package's devDependencies too
    pub include_dev: bool,
    /// Pause between levels
    pub delay: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        CrawlOptions {
            max_depth: 2,
            concurrency: 8,
            include_dev: false,
            delay: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawledPackage {
    pub name: String,
    /// Version the `latest` dist-tag points at, if any
    pub version: Option<String>,
    pub depth: usize,
    /// Dependency name -> declared range, from the `latest` manifest
    pub dependencies: BTreeMap<String, String>,
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlFailure {
    pub name: String,
    pub depth: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    /// Ordered by depth, then name
    pub packages: Vec<CrawledPackage>,
    pub failures: Vec<CrawlFailure>,
}

impl CrawlReport {
    pub fn get(&self, name: &str) -> Option<&CrawledPackage> {
        self.packages.iter().find(|p| p.name == name)
    }
}

// One queued package
#[derive(Debug, Clone)]
struct CrawlItem {
    name: String,
    depth: usize,
}

/// Walks the dependency graph of `root`. See the module header for the
/// traversal order.
pub async fn crawl_dependencies(
    registry: &Registry,
    root: &str,
    options: &CrawlOptions,
) -> Result<CrawlReport> {
    let mut report = CrawlReport::default();
    if options.max_depth == 0 {
        return Ok(report);
    }

    let mut queue = VecDeque::new();
    queue.push_back(CrawlItem {
        name: root.to_string(),
        depth: 1,
    });

    let mut visited = HashSet::new();
    visited.insert(root.to_string());

    while let Some(depth) = queue.front().map(|item| item.depth) {
        let mut batch = Vec::new();
        while queue.front().map(|item| item.depth) == Some(depth) {
            if let Some(item) = queue.pop_front() {
                batch.push(item);
            }
        }

        info!(depth, packages = batch.len(), "crawling dependency level");

        let futures = batch.into_iter().map(|item| {
            let registry = registry.clone();
            async move {
                let result = registry.package_information(&item.name).await;
                (item, result)
            }
        });

        let mut fetched: Vec<(CrawlItem, Result<Package>)> = stream::iter(futures)
            .buffer_unordered(options.concurrency.max(1))
            .collect()
            .await;

        // Completion order is arbitrary; keep the report stable
        fetched.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));

        for (item, result) in fetched {
            let package = match result {
                Ok(package) => package,
                Err(e) if item.depth == 1 => return Err(e),
                Err(e) => {
                    warn!(package = %item.name, error = %e, "failed to fetch dependency");
                    report.failures.push(CrawlFailure {
                        name: item.name,
                        depth: item.depth,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let include_dev = options.include_dev && item.depth == 1;
            let latest = package.latest();
            let dependencies = latest
                .map(|v| v.dependency_map(include_dev))
                .unwrap_or_default();

            if item.depth < options.max_depth {
                for dep in dependencies.keys() {
                    if visited.insert(dep.clone()) {
                        queue.push_back(CrawlItem {
                            name: dep.clone(),
                            depth: item.depth + 1,
                        });
                    }
                }
            }

            report.packages.push(CrawledPackage {
                name: item.name,
                version: package.latest_version().map(str::to_string),
                depth: item.depth,
                deprecated: latest.map(|v| v.is_deprecated()).unwrap_or(false),
                dependencies,
            });
        }

        // Polite crawling: small pause before the next level
        if !queue.is_empty() && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CrawlOptions::default();
        assert_eq!(options.max_depth, 2);
        assert!(!options.include_dev);
    }

    #[tokio::test]
    async fn test_zero_depth_fetches_nothing() {
        let options = crate::registry::Options::new().registry_url("http://127.0.0.1:9");
        let registry = Registry::new(options).unwrap();
        let options = CrawlOptions {
            max_depth: 0,
            ..CrawlOptions::default()
        };
        let report = crawl_dependencies(&registry, "react", &options).await.unwrap();
        assert!(report.packages.is_empty());
        assert!(report.failures.is_empty());
    }
}
