// src/error.rs
// =============================================================================
// Typed errors for the crawl engine.
//
// Only CrawlError can abort a run, and every variant of it is raised before
// the first request goes out. FetchError describes why a single page yielded
// no links; the traversal logs it and moves on.
// =============================================================================

use thiserror::Error;

/// Errors that stop a crawl before it starts.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed could not be parsed as a URL at all
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The seed parsed, but it is not something we can crawl over HTTP
    #[error("seed URL '{url}' has unsupported scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("seed URL '{0}' has no host")]
    MissingHost(String),

    /// The HTTP client could not be built (bad TLS backend, bad user agent...)
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Why a page contributed no outbound links.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with something other than 200 OK
    #[error("HTTP {0}")]
    Status(u16),

    /// Network, timeout, or body decoding failure
    #[error("{0}")]
    Transport(String),
}
