// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Falls back to GET when the server answers HEAD with 405 Method Not Allowed
// - Treats every status code as data; only transport failures become status 0
// - Remembers every verdict for the rest of the run (LinkStatusCache), so a
//   link that appears on twenty pages is requested exactly once
//
// The cache is single-flight: if two checks for the same URL run at the same
// time, the second one waits for the first request instead of sending its own.
// =============================================================================

use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

use super::normalize::is_http;
use crate::config::CrawlConfig;

/// Verdict for one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatus {
    pub is_valid: bool,
    /// HTTP status code, or 0 when no response was received
    pub status: u16,
    /// What went wrong at the transport level, if anything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which status codes count as a working link.
///
/// 200..400 is always valid. 403 is valid by default because plenty of
/// servers refuse automated HEAD/GET requests while the page is fine for a
/// browser; turn `forbidden_is_valid` off to report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub forbidden_is_valid: bool,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            forbidden_is_valid: true,
        }
    }
}

impl StatusPolicy {
    pub fn is_valid(&self, status: u16) -> bool {
        (200..400).contains(&status) || (self.forbidden_is_valid && status == 403)
    }
}

/// Run-scoped memo of link verdicts, keyed by the exact URL string
#[derive(Debug, Default)]
pub struct LinkStatusCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<LinkStatus>>>>,
}

impl LinkStatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the finished verdict for `url`, if there is one
    pub fn get(&self, url: &str) -> Option<LinkStatus> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(url).and_then(|slot| slot.get().cloned())
    }

    /// Number of URLs with a finished verdict
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The lock is only held to find or create the slot, never across an await
    fn slot(&self, url: &str) -> Arc<OnceCell<LinkStatus>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.entry(url.to_string()).or_default().clone()
    }
}

/// Checks links over HTTP
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
    policy: StatusPolicy,
}

impl LinkChecker {
    /// Builds a checker whose client uses the link timeout and redirect limit
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.link_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            policy: config.status_policy,
        })
    }

    /// Checks `url`, consulting and filling `cache`.
    ///
    /// Never fails: network problems come back as an invalid status 0.
    pub async fn check(&self, cache: &LinkStatusCache, url: &str) -> LinkStatus {
        let slot = cache.slot(url);

        if let Some(status) = slot.get() {
            debug!(url, status = status.status, "link status cache hit");
            return status.clone();
        }

        let status = slot.get_or_init(|| self.request_status(url)).await;
        status.clone()
    }

    async fn request_status(&self, url: &str) -> LinkStatus {
        match self.client.head(url).send().await {
            Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
                debug!(url, "HEAD not allowed, retrying with GET");
                self.retry_with_get(url).await
            }
            Ok(response) => self.verdict(response.status().as_u16()),
            Err(e) => {
                debug!(url, error = %e, "HEAD request failed");
                transport_failure(&e)
            }
        }
    }

    // Second chance for servers that refuse HEAD. If this request fails too,
    // the original 405 stands.
    async fn retry_with_get(&self, url: &str) -> LinkStatus {
        match self.client.get(url).send().await {
            Ok(response) => self.verdict(response.status().as_u16()),
            Err(e) => {
                debug!(url, error = %e, "GET fallback failed");
                LinkStatus {
                    is_valid: self.policy.is_valid(405),
                    status: 405,
                    error: Some(describe_error(&e)),
                }
            }
        }
    }

    fn verdict(&self, status: u16) -> LinkStatus {
        LinkStatus {
            is_valid: self.policy.is_valid(status),
            status,
            error: None,
        }
    }
}

fn transport_failure(error: &reqwest::Error) -> LinkStatus {
    LinkStatus {
        is_valid: false,
        status: 0,
        error: Some(describe_error(error)),
    }
}

// Turns a reqwest error into a short human message.
//
// reqwest errors can happen for many reasons (timeouts, DNS, refused
// connections, TLS problems, redirect loops); the top-level Display is
// usually just "error sending request", so we look at the kind first.
fn describe_error(error: &reqwest::Error) -> String {
    let detail = source_chain(error);

    if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        if detail.contains("dns") || detail.contains("resolve") {
            format!("Could not resolve hostname: {detail}")
        } else {
            format!("Connection failed: {detail}")
        }
    } else if detail.contains("certificate") || detail.contains("tls") || detail.contains("ssl") {
        format!("TLS error: {detail}")
    } else {
        detail
    }
}

fn source_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = std::error::Error::source(inner);
    }
    message
}

/// Result of checking one URL outside of a crawl
#[derive(Debug, Clone, Serialize)]
pub struct LinkCheckResult {
    pub url: String,
    #[serde(flatten)]
    pub status: LinkStatus,
}

impl LinkCheckResult {
    pub fn is_ok(&self) -> bool {
        self.status.is_valid
    }
}

/// Checks a list of URLs with up to `concurrency` requests in flight.
///
/// Results come back in input order. Duplicate URLs share one request through
/// the cache. Inputs that are not absolute http(s) URLs are reported as
/// invalid without touching the network or the cache.
pub async fn check_links(
    checker: &LinkChecker,
    cache: &LinkStatusCache,
    urls: Vec<String>,
    concurrency: usize,
) -> Vec<LinkCheckResult> {
    stream::iter(urls)
        .map(|url| async move {
            let status = match Url::parse(url.trim()) {
                Ok(parsed) if is_http(&parsed) => checker.check(cache, parsed.as_str()).await,
                _ => LinkStatus {
                    is_valid: false,
                    status: 0,
                    error: Some("Not an absolute http(s) URL".to_string()),
                },
            };
            LinkCheckResult { url, status }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
