// src/crawl/queue.rs
// =============================================================================
// This module implements website crawling with a breadth-first approach.
//
// How it works:
// 1. Start with the seed URL in a queue (and in the visited set)
// 2. Pop the oldest URL and fetch the page
// 3. Classify every href on it: skipped, or resolved to an absolute URL
// 4. Decide which resolved links join the queue (same host, looks like HTML,
//    not visited yet, ceiling not reached)
// 5. Check every resolved link and file it as valid or broken
// 6. Repeat until the queue is empty (or the run deadline passes)
//
// Expansion happens BEFORE the liveness checks by default. A server that
// stalls or rejects HEAD requests would otherwise hide its pages from the
// crawl. See ExpansionPolicy in src/config.rs before changing this.
//
// A URL is marked visited the moment it is queued, so no page is ever
// fetched twice, and the visited set refuses new entries once it holds
// max_pages URLs. The queue and that check only ever run on this task.
// Pages are identified without their #fragment: "/guide#intro" and
// "/guide#faq" are the same document.
//
// Rust concepts:
// - VecDeque: FIFO queue for breadth-first order
// - Borrowing disjoint fields: the checker and cache are borrowed while the
//   queue is mutated later in the same method
// - Streams: futures::stream::buffered runs checks concurrently but yields
//   results in input order
// =============================================================================

use futures::stream::{self, StreamExt};
use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::checker::{classify_href, is_same_domain, Classification, SkippedLink};
use crate::config::{CrawlConfig, ExpansionPolicy};
use crate::crawl::context::{CrawlTarget, RunContext};
use crate::error::CrawlError;
use crate::report::{CrawlSummary, PageResult};

/// Crawls the site behind `seed` and summarizes its broken links.
///
/// Fails only if the seed is unusable or the HTTP clients can't be built;
/// everything that goes wrong during the crawl ends up in the summary.
pub async fn crawl_site(seed: &str, config: &CrawlConfig) -> Result<CrawlSummary, CrawlError> {
    let pages = crawl_pages(seed, config).await?;
    Ok(CrawlSummary::from_pages(&pages))
}

/// Like crawl_site, but returns every page's full result in visit order
pub async fn crawl_pages(seed: &str, config: &CrawlConfig) -> Result<Vec<PageResult>, CrawlError> {
    let target = CrawlTarget::parse(seed)?;
    let ctx = RunContext::new(target, config.clone())?;
    Ok(Traversal::new(ctx).run().await)
}

struct Traversal {
    ctx: RunContext,
    queue: VecDeque<Url>,
    results: Vec<PageResult>,
}

impl Traversal {
    fn new(mut ctx: RunContext) -> Self {
        let seed = page_identity(ctx.target.seed());
        ctx.visited.insert(seed.as_str());

        Self {
            ctx,
            queue: VecDeque::from([seed]),
            results: Vec::new(),
        }
    }

    async fn run(mut self) -> Vec<PageResult> {
        let started = Instant::now();

        while let Some(page_url) = self.queue.pop_front() {
            if let Some(budget) = self.ctx.config.max_duration {
                if started.elapsed() >= budget {
                    warn!(
                        pending = self.queue.len() + 1,
                        "crawl time budget exhausted, stopping early"
                    );
                    break;
                }
            }

            info!(url = %page_url, "crawling page");
            let result = self.process_page(&page_url).await;
            debug!(
                url = %page_url,
                valid = result.valid_links.len(),
                broken = result.broken_links.len(),
                skipped = result.skipped.len(),
                "page done"
            );
            self.results.push(result);
        }

        info!(
            pages = self.results.len(),
            checked_links = self.ctx.cache.len(),
            "crawl finished"
        );
        self.results
    }

    async fn process_page(&mut self, page_url: &Url) -> PageResult {
        let mut result = PageResult::new(page_url.as_str());

        let fetched = match self.ctx.fetcher.fetch(page_url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(url = %page_url, error = %e, "failed to fetch page, no links taken from it");
                return result.finish();
            }
        };

        if fetched.final_url != *page_url {
            debug!(url = %page_url, final_url = %fetched.final_url, "page was redirected");
        }
        let extracted = fetched.links;

        for skipped in extracted.skipped {
            result.skip(skipped);
        }

        // Resolve everything first; two hrefs resolving to the same URL
        // count as one link on this page.
        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for href in extracted.hrefs {
            // relative hrefs resolve against where the page actually lives
            match classify_href(&href, self.ctx.target.origin(), &fetched.final_url) {
                Classification::Link(url) => {
                    if seen.insert(url.as_str().to_string()) {
                        links.push(url);
                    }
                }
                Classification::Skip(reason) => result.skip(SkippedLink { href, reason }),
            }
        }

        if self.ctx.config.expansion == ExpansionPolicy::BeforeCheck {
            for link in &links {
                self.try_enqueue(link);
            }
        }

        let checker = &self.ctx.checker;
        let cache = &self.ctx.cache;
        let statuses: Vec<_> = stream::iter(&links)
            .map(|link| checker.check(cache, link.as_str()))
            .buffered(self.ctx.config.link_concurrency.max(1))
            .collect()
            .await;

        for (link, status) in links.into_iter().zip(statuses) {
            if self.ctx.config.expansion == ExpansionPolicy::AfterCheck && status.is_valid {
                self.try_enqueue(&link);
            }
            if !status.is_valid {
                debug!(url = %link, status = status.status, "broken link");
            }
            result.record(link.as_str(), status);
        }

        result.finish()
    }

    // Queues `link` for fetching if it belongs to the crawl
    fn try_enqueue(&mut self, link: &Url) -> bool {
        if !is_same_domain(link, self.ctx.target.seed())
            || !self.ctx.config.asset_filter.looks_like_html(link)
        {
            return false;
        }

        let page = page_identity(link);
        if self.ctx.visited.contains(page.as_str()) {
            return false;
        }

        if !self.ctx.visited.insert(page.as_str()) {
            debug!(url = %page, limit = self.ctx.config.max_pages, "page limit reached, not queueing");
            return false;
        }

        self.queue.push_back(page);
        true
    }
}

// The document a URL points at: the fragment never reaches the server
fn page_identity(url: &Url) -> Url {
    let mut page = url.clone();
    page.set_fragment(None);
    page
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why mark pages visited when they are queued, not when they are fetched?
//    - Two pages can both link to /about before /about is fetched
//    - Marking at queue time means the second link sees it as visited
//    - So /about sits in the queue once and is fetched once
//
// 2. What does stream::iter(..).buffered(n) do?
//    - Turns a list of futures into a stream
//    - Runs up to n of them at the same time
//    - Unlike buffer_unordered, results come out in the original order,
//      so a page's broken links are listed in document order
//
// 3. Why is try_enqueue a separate method?
//    - It needs &mut self (queue and visited set)
//    - process_page calls it before the checks (BeforeCheck) or after each
//      check (AfterCheck); keeping it in one place keeps both paths identical
// -----------------------------------------------------------------------------
