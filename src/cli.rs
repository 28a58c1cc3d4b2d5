// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is described with structs and
// attributes, and clap generates parsing, --help and --version for us.
//
// The CLI only collects input. Turning it into a CrawlConfig happens in
// SiteArgs::to_config so the crawl engine never sees clap types.
//
// Rust concepts:
// - Derive macros: Parser, Subcommand and Args generate the parsing code
// - #[command(flatten)]: reuse one group of flags in several subcommands
// - Option<T>: flags the user may leave out
// - Struct update syntax: `..CrawlConfig::default()` fills the remaining fields
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use link_warden::checker::{AssetFilter, StatusPolicy};
use link_warden::config::{parse_page_limit, CrawlConfig, ExpansionPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "link-warden",
    version,
    about = "Crawl a website and report its broken links",
    long_about = "link-warden crawls a website breadth-first from a starting URL, stays on the same \
                  host, and checks every link it finds. Exit code 0 means no broken links, 1 means \
                  broken links were found, 2 means the crawl could not run."
)]
pub struct Cli {
    /// Log what the crawler is doing (to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and report broken links per page
    ///
    /// Example: link-warden site https://example.com --max-pages 100
    Site(SiteArgs),

    /// Check a list of URLs without crawling
    ///
    /// Example: link-warden check https://example.com/a https://example.com/b
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct SiteArgs {
    /// Website URL to start from (e.g., https://example.com)
    pub website_url: String,

    /// Output the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of pages to crawl (invalid values fall back to 50)
    #[arg(long, env = "MAX_PAGES")]
    pub max_pages: Option<String>,

    #[command(flatten)]
    pub request: RequestArgs,

    /// Seconds to wait for a page to download
    #[arg(long, default_value_t = 10)]
    pub page_timeout: u64,

    /// Only follow links that checked valid (fewer pages on HEAD-hostile servers)
    #[arg(long)]
    pub expand_after_check: bool,

    /// Extra file extensions to treat as assets (never crawled, still checked)
    #[arg(long = "asset-ext", value_delimiter = ',')]
    pub asset_extensions: Vec<String>,

    /// File extensions to always crawl as pages, overriding the asset list
    #[arg(long = "html-ext", value_delimiter = ',')]
    pub html_extensions: Vec<String>,

    /// Stop crawling new pages after this many seconds
    #[arg(long)]
    pub max_duration: Option<u64>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// URLs to check
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Output results as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub request: RequestArgs,
}

/// Settings shared by anything that checks links
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Seconds to wait for a single link check
    #[arg(long, default_value_t = 5)]
    pub link_timeout: u64,

    /// Redirects to follow before a link counts as broken
    #[arg(long, default_value_t = 5)]
    pub max_redirects: usize,

    /// Report 403 Forbidden as broken (by default it counts as valid)
    #[arg(long)]
    pub strict_forbidden: bool,

    /// How many link checks may run at once
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,
}

impl RequestArgs {
    fn apply(&self, config: &mut CrawlConfig) {
        config.link_timeout = Duration::from_secs(self.link_timeout);
        config.max_redirects = self.max_redirects;
        config.status_policy = StatusPolicy {
            forbidden_is_valid: !self.strict_forbidden,
        };
        config.link_concurrency = self.concurrency.max(1);
    }
}

impl SiteArgs {
    pub fn to_config(&self) -> CrawlConfig {
        let mut config = CrawlConfig {
            max_pages: parse_page_limit(self.max_pages.as_deref()),
            page_timeout: Duration::from_secs(self.page_timeout),
            expansion: if self.expand_after_check {
                ExpansionPolicy::AfterCheck
            } else {
                ExpansionPolicy::BeforeCheck
            },
            asset_filter: AssetFilter::default()
                .deny(&self.asset_extensions)
                .allow(&self.html_extensions),
            max_duration: self.max_duration.map(Duration::from_secs),
            ..CrawlConfig::default()
        };
        self.request.apply(&mut config);
        config
    }
}

impl CheckArgs {
    pub fn to_config(&self) -> CrawlConfig {
        let mut config = CrawlConfig::default();
        self.request.apply(&mut config);
        config
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is max_pages an Option<String> and not a usize?
//    - clap would reject "--max-pages many" with an error
//    - We want bad values to fall back to 50 instead
//    - parse_page_limit does that fallback in one place
//
// 2. What does env = "MAX_PAGES" do?
//    - If the flag is missing, clap reads the environment variable
//    - A flag on the command line always wins
//
// 3. What is #[command(flatten)]?
//    - RequestArgs is a normal struct with its own #[arg] fields
//    - Flattening pastes those fields into SiteArgs and CheckArgs
//    - Both subcommands get --link-timeout, --concurrency, etc.
//
// 4. Why `fn apply(&self, config: &mut CrawlConfig)`?
//    - &self borrows the arguments, we only read them
//    - &mut CrawlConfig lets us change the config in place
//    - Nothing is moved, so the caller keeps ownership of both
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn site(args: &[&str]) -> SiteArgs {
        let argv = ["link-warden", "site"].iter().chain(args).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Site(site) => site,
            other => panic!("expected site command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_site_defaults() {
        let config = site(&["https://example.com"]).to_config();
        assert_eq!(config.max_pages, 50);
        assert_eq!(config.page_timeout, Duration::from_secs(10));
        assert_eq!(config.link_timeout, Duration::from_secs(5));
        assert_eq!(config.max_redirects, 5);
        assert!(config.status_policy.forbidden_is_valid);
        assert_eq!(config.expansion, ExpansionPolicy::BeforeCheck);
        assert_eq!(config.link_concurrency, 1);
    }

    #[test]
    fn test_site_flags() {
        let args = site(&[
            "https://example.com",
            "--max-pages",
            "7",
            "--strict-forbidden",
            "--expand-after-check",
            "--concurrency",
            "8",
            "--asset-ext",
            "pdf,docx",
            "--max-duration",
            "30",
        ]);
        let config = args.to_config();
        assert_eq!(config.max_pages, 7);
        assert!(!config.status_policy.forbidden_is_valid);
        assert_eq!(config.expansion, ExpansionPolicy::AfterCheck);
        assert_eq!(config.link_concurrency, 8);
        assert_eq!(config.max_duration, Some(Duration::from_secs(30)));

        let pdf = url::Url::parse("https://example.com/a.pdf").unwrap();
        assert!(!config.asset_filter.looks_like_html(&pdf));
    }

    #[test]
    fn test_check_args_share_request_flags() {
        let cli = Cli::try_parse_from([
            "link-warden",
            "check",
            "https://example.com/a",
            "not a url",
            "--link-timeout",
            "2",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.urls.len(), 2);
        assert_eq!(args.to_config().link_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_bad_page_limit_falls_back() {
        let config = site(&["https://example.com", "--max-pages", "many"]).to_config();
        assert_eq!(config.max_pages, 50);
    }
}
