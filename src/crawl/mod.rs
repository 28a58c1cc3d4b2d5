// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Same-domain restriction (hostname match), static assets are not crawled
// - Page ceiling and optional time budget
// - Every link found is checked; results are grouped per page
//
// Submodules:
// - context: per-run state (target, visited set, link cache, clients)
// - fetch: downloads pages and extracts their anchors
// - queue: the traversal itself
// =============================================================================

mod context;
mod fetch;
mod queue;

pub use context::{CrawlTarget, RunContext, VisitedSet};
pub use fetch::{FetchedPage, PageFetcher};
pub use queue::{crawl_pages, crawl_site};
