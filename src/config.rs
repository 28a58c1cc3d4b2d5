// src/config.rs
// =============================================================================
// Tunables for one crawl run.
//
// Everything the engine needs to know lives in CrawlConfig, so a run never
// reads globals or environment variables on its own. The CLI (src/cli.rs)
// fills this struct from flags and env vars.
// =============================================================================

use std::time::Duration;

use crate::checker::{AssetFilter, StatusPolicy};

/// Page ceiling used when the caller gives none (or gives garbage)
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Timeout for fetching a page's HTML
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a single HEAD/GET liveness check
pub const DEFAULT_LINK_TIMEOUT: Duration = Duration::from_secs(5);

/// Redirects followed by a liveness check before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// When a newly discovered same-domain page gets queued.
///
/// `BeforeCheck` decides expansion before the link is checked, so servers that
/// reject or stall on HEAD requests do not hide pages from the crawl.
/// `AfterCheck` only follows links that checked valid; it crawls less on
/// HEAD-hostile servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionPolicy {
    #[default]
    BeforeCheck,
    AfterCheck,
}

/// Settings for a single crawl run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Maximum number of pages that may ever be queued (and so fetched)
    pub max_pages: usize,
    pub page_timeout: Duration,
    pub link_timeout: Duration,
    pub max_redirects: usize,
    /// Which status codes count as a working link
    pub status_policy: StatusPolicy,
    pub expansion: ExpansionPolicy,
    /// Decides which links look like HTML pages worth crawling
    pub asset_filter: AssetFilter,
    /// How many link checks of one page may be in flight at once (1 = sequential)
    pub link_concurrency: usize,
    /// Optional wall-clock budget for the whole run
    pub max_duration: Option<Duration>,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            link_timeout: DEFAULT_LINK_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            status_policy: StatusPolicy::default(),
            expansion: ExpansionPolicy::default(),
            asset_filter: AssetFilter::default(),
            link_concurrency: 1,
            max_duration: None,
            user_agent: concat!("link-warden/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Interprets a user-supplied page ceiling.
///
/// Only a positive integer is accepted; anything else (missing, non-numeric,
/// zero, negative) falls back to DEFAULT_MAX_PAGES.
pub fn parse_page_limit(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&limit| limit > 0)
        .unwrap_or(DEFAULT_MAX_PAGES)
}
