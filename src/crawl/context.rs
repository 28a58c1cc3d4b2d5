// src/crawl/context.rs
// =============================================================================
// State owned by a single crawl run.
//
// Every run builds its own RunContext: the parsed target, the visited set,
// the link status cache and the HTTP clients. Nothing here is global, so two
// crawls can run side by side without seeing each other's state.
// =============================================================================

use std::collections::HashSet;
use url::Url;

use crate::checker::{is_http, LinkChecker, LinkStatusCache};
use crate::config::CrawlConfig;
use crate::crawl::fetch::PageFetcher;
use crate::error::CrawlError;

/// The seed of a crawl and the domain it defines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    seed: Url,
    origin: Url,
}

impl CrawlTarget {
    /// Parses and validates the seed URL.
    ///
    /// This is the only place a crawl can fail: the seed must be an absolute
    /// http(s) URL with a host.
    pub fn parse(seed: &str) -> Result<Self, CrawlError> {
        let seed_str = seed.trim();
        let seed = Url::parse(seed_str).map_err(|source| CrawlError::InvalidSeed {
            url: seed_str.to_string(),
            source,
        })?;

        if !is_http(&seed) {
            return Err(CrawlError::UnsupportedScheme {
                url: seed_str.to_string(),
                scheme: seed.scheme().to_string(),
            });
        }
        if seed.host_str().map_or(true, str::is_empty) {
            return Err(CrawlError::MissingHost(seed_str.to_string()));
        }

        // scheme://host[:port]/ ; root-relative hrefs resolve against this
        let mut origin = seed.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);

        Ok(Self { seed, origin })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn host(&self) -> &str {
        self.seed.host_str().unwrap_or_default()
    }
}

/// URLs already queued for fetching, capped at the page ceiling
#[derive(Debug, Clone)]
pub struct VisitedSet {
    urls: HashSet<String>,
    limit: usize,
}

impl VisitedSet {
    pub fn new(limit: usize) -> Self {
        Self {
            urls: HashSet::new(),
            limit,
        }
    }

    /// Marks `url` visited. Returns false if it already was, or if the set
    /// is full.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.is_full() || self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn is_full(&self) -> bool {
        self.urls.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// All per-run state, handed to each step of the traversal
#[derive(Debug)]
pub struct RunContext {
    pub target: CrawlTarget,
    pub config: CrawlConfig,
    pub visited: VisitedSet,
    pub cache: LinkStatusCache,
    pub fetcher: PageFetcher,
    pub checker: LinkChecker,
}

impl RunContext {
    pub fn new(target: CrawlTarget, config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = PageFetcher::new(&config)?;
        let checker = LinkChecker::new(&config)?;

        Ok(Self {
            target,
            visited: VisitedSet::new(config.max_pages.max(1)),
            cache: LinkStatusCache::new(),
            fetcher,
            checker,
            config,
        })
    }
}
