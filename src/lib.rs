// src/lib.rs
// =============================================================================
// link-warden: crawl a website and find its broken links.
//
// The crawl engine lives in this library so other front ends (an HTTP
// endpoint, a UI) can drive it the same way the CLI in src/main.rs does:
//
//     let summary = link_warden::crawl_site("https://example.com", &CrawlConfig::default()).await?;
//
// Modules:
// - checker: href resolution, anchor extraction, link liveness checks
// - crawl: breadth-first traversal and per-run state
// - report: per-page results and the final summary
// - config / error: tunables and typed errors
// =============================================================================

pub mod checker;
pub mod config;
pub mod crawl;
pub mod error;
pub mod report;

pub use config::CrawlConfig;
pub use crawl::crawl_site;
pub use error::CrawlError;
pub use report::CrawlSummary;
