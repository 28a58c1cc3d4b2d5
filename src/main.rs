// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the results as a table or JSON
// 5. Exit with proper code (0 = no broken links, 1 = broken links, 2 = error)
// =============================================================================

// The crawl engine itself lives in the library (src/lib.rs); this binary
// only parses arguments and prints.
mod cli; // src/cli.rs - command-line parsing

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{CheckArgs, Cli, Commands, SiteArgs};
use link_warden::checker::{self, LinkCheckResult, LinkChecker, LinkStatusCache};
use link_warden::{crawl, CrawlSummary};

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
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err   = the crawl could not run (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Site(args) => handle_site_scan(args).await,
        Commands::Check(args) => handle_check(args).await,
    }
}

// RUST_LOG wins if set; otherwise warnings only, or info with --verbose.
// Logs go to stderr so --json output on stdout stays parseable.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn handle_site_scan(args: &SiteArgs) -> Result<i32> {
    let config = args.to_config();

    if !args.json {
        println!("🔍 Scanning website: {}", args.website_url);
        println!("📊 Page limit: {}", config.max_pages);
    }

    let summary = crawl::crawl_site(&args.website_url, &config)
        .await
        .with_context(|| format!("could not crawl {}", args.website_url))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(if summary.has_broken_links() { 1 } else { 0 })
}

async fn handle_check(args: &CheckArgs) -> Result<i32> {
    let config = args.to_config();
    let checker = LinkChecker::new(&config).context("could not build HTTP client")?;
    let cache = LinkStatusCache::new();

    if !args.json {
        println!("🌐 Checking {} link(s)...\n", args.urls.len());
    }

    let results = checker::check_links(&checker, &cache, args.urls.clone(), config.link_concurrency).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_table(&results);
    }

    let broken_count = results.iter().filter(|r| !r.is_ok()).count();
    Ok(if broken_count > 0 { 1 } else { 0 })
}

fn print_summary(summary: &CrawlSummary) {
    println!("📄 Crawled {} page(s)\n", summary.total_pages);

    for page in &summary.pages {
        if page.broken_link_count == 0 {
            println!("✅ {} ({} links)", page.url, page.total_links);
            continue;
        }

        println!(
            "❌ {} ({} links, {} broken)",
            page.url, page.total_links, page.broken_link_count
        );
        for link in &page.broken_links {
            let detail = link.error.as_deref().unwrap_or("");
            println!("     {:<60} {:<8} {}", truncate(&link.url, 57), format_status(link.status), detail);
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages: {}", summary.total_pages);
    println!("   🔗 Links: {}", summary.total_links);
    println!("   ❌ Broken: {}", summary.total_broken_links);
}

fn print_table(results: &[LinkCheckResult]) {
    println!("{:<60} {:<8} {:<30}", "URL", "STATUS", "MESSAGE");
    println!("{}", "=".repeat(100));

    for result in results {
        let marker = if result.is_ok() { "✅" } else { "❌" };
        let message = result.status.error.as_deref().unwrap_or("");
        println!(
            "{:<60} {:<8} {} {}",
            truncate(&result.url, 57),
            format_status(result.status.status),
            marker,
            message
        );
    }

    println!();

    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    println!("📊 Summary:");
    println!("   ✅ OK: {}", ok_count);
    println!("   ❌ Broken: {}", results.len() - ok_count);
    println!("   📋 Total: {}", results.len());
}

// Status 0 means the request never got an answer
fn format_status(status: u16) -> String {
    if status == 0 {
        "ERROR".to_string()
    } else {
        status.to_string()
    }
}

fn truncate(url: &str, max: usize) -> String {
    if url.chars().count() > max {
        let head: String = url.chars().take(max).collect();
        format!("{}...", head)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_urls() {
        assert_eq!(truncate("https://example.com", 57), "https://example.com");
        let long = format!("https://example.com/{}", "a".repeat(80));
        let shown = truncate(&long, 57);
        assert_eq!(shown.chars().count(), 60);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(0), "ERROR");
        assert_eq!(format_status(404), "404");
    }
}
