// src/crawl/mod.rs
// =============================================================================
// Dependency crawling.
//
// Features:
// - Breadth-first walk starting from one package
// - Configurable depth limit and per-level concurrency
// - Each package fetched once; failures recorded, not fatal
// - Polite crawling with a delay between levels
// =============================================================================

mod queue;

pub use queue::{crawl_dependencies, CrawlFailure, CrawlOptions, CrawlReport, CrawledPackage};
