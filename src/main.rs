// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so --json output on stdout stays clean)
// 3. Merge config file and flags into registry options
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = success, 1 = problems found, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use npm_crawler::checker;
use npm_crawler::crawl::{self, CrawlOptions, CrawlReport};
use npm_crawler::models::{DownloadRangeStats, DownloadStats, Package, SearchResult, Version};
use npm_crawler::registry::{self, Mirror, MirrorProbe, Options, Registry};
use npm_crawler::settings::Settings;
use npm_crawler::site::{self, Issue, SiteConfig};

const DEFAULT_CONCURRENCY: usize = 8;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = success
//   Ok(1) = the command ran but found problems
//   Err   = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::discover(cli.config.as_deref())
        .context("loading config file")?
        .merge(cli.flag_settings());
    let options = settings.to_options()?;
    let concurrency = settings.concurrency_or(DEFAULT_CONCURRENCY);

    match cli.command {
        Commands::Info { package, json } => handle_info(&options, &package, json).await,
        Commands::Version { package, version_or_tag, json } => {
            handle_version(&options, &package, &version_or_tag, json).await
        }
        Commands::Search { text, limit, json } => handle_search(&options, &text, limit, json).await,
        Commands::Downloads { package, period, daily, json } => {
            handle_downloads(&options, &package, &period, daily, json).await
        }
        Commands::Status { json } => handle_status(&options, json).await,
        Commands::Mirrors { json } => handle_mirrors(&options, json).await,
        Commands::Crawl { package, max_depth, concurrency: crawl_concurrency, dev, json } => {
            let crawl_options = CrawlOptions {
                max_depth,
                concurrency: crawl_concurrency.unwrap_or(concurrency),
                include_dev: dev,
                ..CrawlOptions::default()
            };
            handle_crawl(&options, &package, &crawl_options, json).await
        }
        Commands::Site { file, docs, external, json } => {
            handle_site(&options, &file, docs, external, concurrency, json).await
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("NPM_CRAWLER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn registry_for(options: &Options) -> Result<Registry> {
    Registry::new(options.clone()).context("creating registry client")
}

async fn handle_info(options: &Options, name: &str, json: bool) -> Result<i32> {
    let registry = registry_for(options)?;
    let package = registry
        .package_information(name)
        .await
        .with_context(|| format!("fetching package '{}'", name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&package)?);
    } else {
        print_package(&package);
    }
    Ok(0)
}

fn print_package(package: &Package) {
    println!(
        "📦 {}@{}",
        package.name,
        package.latest_version().unwrap_or("(no latest tag)")
    );
    if let Some(description) = &package.description {
        println!("   {}", description);
    }
    println!();

    if let Some(license) = &package.license {
        println!("   License:      {}", license);
    }
    if let Some(homepage) = &package.homepage {
        println!("   Homepage:     {}", homepage);
    }
    if let Some(repo) = package.repository.as_ref().and_then(|r| r.web_url()) {
        println!("   Repository:   {}", repo);
    }
    println!("   Versions:     {}", package.versions.len());
    println!("   Maintainers:  {}", package.maintainers.len());
    if let Some(created) = package.created() {
        println!("   Created:      {}", created.format("%Y-%m-%d"));
    }
    if let Some(modified) = package.modified() {
        println!("   Modified:     {}", modified.format("%Y-%m-%d"));
    }

    if !package.dist_tags.is_empty() {
        println!("\n🏷️  Dist-tags:");
        for (tag, version) in &package.dist_tags {
            println!("   {:<12} {}", tag, version);
        }
    }

    if let Some(latest) = package.latest() {
        print_dependencies(latest);
    }
}

async fn handle_version(options: &Options, name: &str, version: &str, json: bool) -> Result<i32> {
    let registry = registry_for(options)?;
    let manifest = registry
        .package_version(name, version)
        .await
        .with_context(|| format!("fetching {}@{}", name, version))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(0);
    }

    println!("📦 {}@{}", manifest.name, manifest.version);
    if let Some(description) = &manifest.description {
        println!("   {}", description);
    }
    if let Some(message) = &manifest.deprecated {
        println!("   ⚠️  DEPRECATED: {}", message);
    }
    println!();
    if let Some(license) = &manifest.license {
        println!("   License:      {}", license);
    }
    if let Some(dist) = &manifest.dist {
        if let Some(tarball) = &dist.tarball {
            println!("   Tarball:      {}", tarball);
        }
        if let Some(integrity) = &dist.integrity {
            println!("   Integrity:    {}", integrity);
        }
        if let Some(shasum) = &dist.shasum {
            println!("   Shasum:       {}", shasum);
        }
        if let Some(size) = dist.unpacked_size {
            println!("   Unpacked:     {} bytes", size);
        }
    }
    print_dependencies(&manifest);
    Ok(0)
}

fn print_dependencies(version: &Version) {
    if version.dependencies.is_empty() {
        println!("\n   No dependencies");
        return;
    }
    println!("\n🔗 Dependencies ({}):", version.dependencies.len());
    for (name, range) in &version.dependencies {
        println!("   {:<40} {}", name, range);
    }
}

async fn handle_search(options: &Options, text: &str, limit: usize, json: bool) -> Result<i32> {
    let registry = registry_for(options)?;
    let result = registry
        .search_packages(text, limit)
        .await
        .with_context(|| format!("searching for '{}'", text))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_search(&result);
    }
    Ok(0)
}

fn print_search(result: &SearchResult) {
    println!("{:<40} {:<15} {:<7} {}", "NAME", "VERSION", "SCORE", "DESCRIPTION");
    println!("{}", "=".repeat(110));

    for object in &result.objects {
        let package = &object.package;
        println!(
            "{:<40} {:<15} {:<7.3} {}",
            truncate(&package.name, 39),
            truncate(&package.version, 14),
            object.score.final_score,
            truncate(package.description.as_deref().unwrap_or(""), 45)
        );
    }

    println!();
    println!("📊 Showing {} of {} match(es)", result.objects.len(), result.total);
}

async fn handle_downloads(
    options: &Options,
    name: &str,
    period: &str,
    daily: bool,
    json: bool,
) -> Result<i32> {
    let registry = registry_for(options)?;

    if daily {
        let stats = registry
            .download_range(name, period)
            .await
            .with_context(|| format!("fetching daily downloads of '{}'", name))?;
        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print_range(&stats);
        }
    } else {
        let stats = registry
            .download_stats(name, period)
            .await
            .with_context(|| format!("fetching downloads of '{}'", name))?;
        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print_point(&stats);
        }
    }
    Ok(0)
}

fn print_point(stats: &DownloadStats) {
    println!(
        "📥 {}: {} download(s) from {} to {}",
        stats.package, stats.downloads, stats.start, stats.end
    );
}

fn print_range(stats: &DownloadRangeStats) {
    println!("{:<12} {:>12}", "DAY", "DOWNLOADS");
    println!("{}", "=".repeat(25));
    for day in &stats.downloads {
        println!("{:<12} {:>12}", day.day, day.downloads);
    }
    println!();
    println!("📊 {} total from {} to {}", stats.total(), stats.start, stats.end);
    if let Some(peak) = stats.peak() {
        println!("   Peak: {} on {}", peak.downloads, peak.day);
    }
}

async fn handle_status(options: &Options, json: bool) -> Result<i32> {
    let registry = registry_for(options)?;
    let info = registry
        .registry_information()
        .await
        .with_context(|| format!("fetching status of {}", options.registry_url))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(0);
    }

    println!("🗄️  {}", options.registry_url);
    println!("   Database:        {}", info.db_name.as_deref().unwrap_or("-"));
    if let Some(count) = info.doc_count {
        println!("   Documents:       {}", count);
    }
    if let Some(deleted) = info.doc_del_count {
        println!("   Deleted:         {}", deleted);
    }
    if let Some(seq) = &info.update_seq {
        println!("   Update seq:      {}", seq);
    }
    if let Some(sizes) = &info.sizes {
        println!("   File size:       {} bytes", sizes.file);
        println!("   Active size:     {} bytes", sizes.active);
    }
    println!("   Compacting:      {}", info.compact_running);
    Ok(0)
}

async fn handle_mirrors(options: &Options, json: bool) -> Result<i32> {
    if !json {
        println!("🔍 Probing {} mirror(s)...\n", Mirror::ALL.len());
    }
    let probes = registry::probe_mirrors(&Mirror::ALL, options).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&probes)?);
    } else {
        print_probes(&probes);
    }

    let unreachable = probes.iter().filter(|p| !p.reachable).count();
    Ok(if unreachable > 0 { 1 } else { 0 })
}

fn print_probes(probes: &[MirrorProbe]) {
    println!("{:<14} {:<50} {:<14} {:>10}", "MIRROR", "URL", "STATUS", "LATENCY");
    println!("{}", "=".repeat(91));

    for probe in probes {
        let status = if probe.reachable { "✅ OK" } else { "❌ DOWN" };
        println!(
            "{:<14} {:<50} {:<14} {:>8}ms",
            probe.mirror.name(),
            truncate(&probe.url, 49),
            status,
            probe.latency_ms
        );
        if let Some(error) = &probe.error {
            println!("{:<14} {}", "", truncate(error, 76));
        }
    }

    let ok = probes.iter().filter(|p| p.reachable).count();
    println!();
    println!("📊 Summary:");
    println!("   ✅ Reachable: {}", ok);
    println!("   ❌ Down: {}", probes.len() - ok);
}

async fn handle_crawl(
    options: &Options,
    name: &str,
    crawl_options: &CrawlOptions,
    json: bool,
) -> Result<i32> {
    let registry = registry_for(options)?;
    if !json {
        println!("🔍 Crawling dependencies of {} (max depth {})", name, crawl_options.max_depth);
    }

    let report = crawl::crawl_dependencies(&registry, name, crawl_options)
        .await
        .with_context(|| format!("crawling '{}'", name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_crawl(&report);
    }

    Ok(if report.failures.is_empty() { 0 } else { 1 })
}

fn print_crawl(report: &CrawlReport) {
    println!();
    for package in &report.packages {
        let indent = "  ".repeat(package.depth.saturating_sub(1));
        let deprecated = if package.deprecated { "  ⚠️  deprecated" } else { "" };
        println!(
            "{}{}@{} ({} deps){}",
            indent,
            package.name,
            package.version.as_deref().unwrap_or("?"),
            package.dependencies.len(),
            deprecated
        );
    }

    for failure in &report.failures {
        println!("❌ {} [depth {}]: {}", failure.name, failure.depth, failure.error);
    }

    println!();
    println!("📊 Summary:");
    println!("   📦 Packages: {}", report.packages.len());
    println!("   ❌ Failed: {}", report.failures.len());
}

async fn handle_site(
    options: &Options,
    file: &Path,
    docs: Option<PathBuf>,
    external: bool,
    concurrency: usize,
    json: bool,
) -> Result<i32> {
    let config = SiteConfig::load(file)?;
    let docs_dir = docs.unwrap_or_else(|| {
        file.parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let mut issues = site::validate(&config);
    issues.extend(site::check_pages(&config, &docs_dir)?);

    let mut link_results = Vec::new();
    if external {
        let links = site::external_links(&config);
        link_results = checker::check_links(links, options, concurrency).await?;
        for result in link_results.iter().filter(|r| !r.is_ok()) {
            issues.push(Issue::error(
                None,
                format!(
                    "external link {} is {:?}: {}",
                    result.url,
                    result.status,
                    result.message.as_deref().unwrap_or("")
                ),
            ));
        }
    }

    if json {
        let output = serde_json::json!({
            "issues": issues,
            "links": link_results,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_issues(&issues, file);
    }

    Ok(if issues.iter().any(Issue::is_error) { 1 } else { 0 })
}

fn print_issues(issues: &[Issue], file: &Path) {
    if issues.is_empty() {
        println!("✅ {} is consistent and every link has a page", file.display());
        return;
    }
    for issue in issues {
        println!("{}", issue);
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    println!();
    println!("📊 Summary:");
    println!("   ❌ Errors: {}", errors);
    println!("   ⚠️  Warnings: {}", issues.len() - errors);
}

/// Shortens `text` to at most `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("react", 10), "react");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        // Multi-byte text must not be cut inside a character
        assert_eq!(truncate("高性能客户端支持多镜像源", 6), "高性能...");
    }
}
