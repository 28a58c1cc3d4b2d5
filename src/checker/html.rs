// src/checker/html.rs
// =============================================================================
// Pulls raw anchor hrefs out of an HTML document.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (built on html5ever, the Servo parser)
// - Supports CSS selectors for finding elements
//
// Only <a href="..."> is looked at. <link>, <img src> and <script src> are
// not part of a page's navigable links.
//
// The hrefs are NOT resolved here. Resolution needs the crawl origin and is
// done by the traversal via normalize::classify_href. What we do decide here
// are the skip reasons that only need the raw text (blank, anchor,
// javascript), so the report can show exactly what the page contained.
// =============================================================================

use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::normalize::SkipReason;

// "a[href]" = every <a> tag that carries an href attribute
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector is valid"));

/// An href that was not checked, with the reason why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLink {
    /// The trimmed href exactly as written in the page
    pub href: String,
    pub reason: SkipReason,
}

/// Everything a page offered, split into candidates and early skips
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Trimmed hrefs still to be resolved, deduplicated, in document order
    pub hrefs: Vec<String>,
    /// Hrefs rejected from their text alone
    pub skipped: Vec<SkippedLink>,
}

impl ExtractedLinks {
    pub fn is_empty(&self) -> bool {
        self.hrefs.is_empty() && self.skipped.is_empty()
    }
}

/// Extracts every anchor href from `html`.
///
/// Duplicates (after trimming) are dropped so a page that links to "/docs"
/// ten times only contributes one candidate.
pub fn extract_anchors(html: &str) -> ExtractedLinks {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut extracted = ExtractedLinks::default();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(raw) = element.value().attr("href") else {
            continue;
        };
        let href = raw.trim();

        if !seen.insert(href.to_string()) {
            continue;
        }

        match SkipReason::from_raw(href) {
            Some(reason) => extracted.skipped.push(SkippedLink {
                href: href.to_string(),
                reason,
            }),
            None => extracted.hrefs.push(href.to_string()),
        }
    }

    extracted
}
