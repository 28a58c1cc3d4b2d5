// src/checker/mod.rs
// =============================================================================
// Link-level building blocks of the crawler.
//
// Submodules:
// - normalize: Resolves raw hrefs into absolute URLs (or skip reasons)
// - html: Extracts anchor hrefs from an HTML page
// - http: Checks whether a URL is alive, with a run-scoped cache
//
// None of these know about queues or pages; the crawl module drives them.
// =============================================================================

mod html;
mod http;
mod normalize;

pub use html::{extract_anchors, ExtractedLinks, SkippedLink};
pub use http::{check_links, LinkCheckResult, LinkChecker, LinkStatus, LinkStatusCache, StatusPolicy};
pub use normalize::{classify_href, is_http, is_same_domain, AssetFilter, Classification, SkipReason};
