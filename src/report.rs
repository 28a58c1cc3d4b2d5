// src/report.rs
// =============================================================================
// Per-page results and the final crawl summary.
//
// A PageResult is filled while its page is processed and frozen with
// finish(). The CrawlSummary is built once, after the crawl, from all of
// them. Its JSON shape (camelCase) is what --json prints.
// =============================================================================

use serde::Serialize;

use crate::checker::{LinkStatus, SkippedLink};

/// A link that checked out fine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidLink {
    pub url: String,
    pub status: u16,
}

/// A link that is unreachable or answered with a failure status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub url: String,
    /// HTTP status, or 0 when the request never got an answer
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything found on one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub url: String,
    pub valid_links: Vec<ValidLink>,
    pub broken_links: Vec<BrokenLink>,
    pub skipped: Vec<SkippedLink>,
    pub total_links: usize,
}

impl PageResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            valid_links: Vec::new(),
            broken_links: Vec::new(),
            skipped: Vec::new(),
            total_links: 0,
        }
    }

    /// Files a checked link under valid or broken
    pub fn record(&mut self, url: impl Into<String>, status: LinkStatus) {
        let url = url.into();
        if status.is_valid {
            self.valid_links.push(ValidLink {
                url,
                status: status.status,
            });
        } else {
            self.broken_links.push(BrokenLink {
                url,
                status: status.status,
                error: status.error,
            });
        }
    }

    pub fn skip(&mut self, link: SkippedLink) {
        self.skipped.push(link);
    }

    /// Freezes the link count; no more links are recorded after this
    pub fn finish(mut self) -> Self {
        self.total_links = self.valid_links.len() + self.broken_links.len() + self.skipped.len();
        self
    }
}

/// One page's entry in the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub url: String,
    pub total_links: usize,
    pub broken_link_count: usize,
    pub broken_links: Vec<BrokenLink>,
}

/// Aggregate over a whole crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    pub total_pages: usize,
    pub total_links: usize,
    pub total_broken_links: usize,
    /// Every visited page, most broken links first (ties keep visit order)
    pub pages: Vec<PageReport>,
}

impl CrawlSummary {
    pub fn from_pages(results: &[PageResult]) -> Self {
        let mut pages: Vec<PageReport> = results
            .iter()
            .map(|page| PageReport {
                url: page.url.clone(),
                total_links: page.total_links,
                broken_link_count: page.broken_links.len(),
                broken_links: page.broken_links.clone(),
            })
            .collect();

        // sort_by is stable, so equal counts stay in visit order
        pages.sort_by(|a, b| b.broken_link_count.cmp(&a.broken_link_count));

        Self {
            total_pages: results.len(),
            total_links: results.iter().map(|page| page.total_links).sum(),
            total_broken_links: results.iter().map(|page| page.broken_links.len()).sum(),
            pages,
        }
    }

    pub fn has_broken_links(&self) -> bool {
        self.total_broken_links > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::SkipReason;

    fn ok(status: u16) -> LinkStatus {
        LinkStatus { is_valid: true, status, error: None }
    }

    fn broken(status: u16) -> LinkStatus {
        LinkStatus { is_valid: false, status, error: None }
    }

    fn page(url: &str, valid: usize, broken_count: usize) -> PageResult {
        let mut result = PageResult::new(url);
        for i in 0..valid {
            result.record(format!("{url}/ok{i}"), ok(200));
        }
        for i in 0..broken_count {
            result.record(format!("{url}/bad{i}"), broken(404));
        }
        result.finish()
    }

    #[test]
    fn test_total_links_counts_every_category() {
        let mut result = PageResult::new("https://example.com/");
        result.record("https://example.com/a", ok(200));
        result.record("https://example.com/b", broken(0));
        result.skip(SkippedLink { href: "#top".into(), reason: SkipReason::Anchor });
        let result = result.finish();

        assert_eq!(result.valid_links.len(), 1);
        assert_eq!(result.broken_links.len(), 1);
        assert_eq!(result.total_links, 3);
    }

    #[test]
    fn test_summary_totals() {
        let summary = CrawlSummary::from_pages(&[page("a", 2, 1), page("b", 0, 2), page("c", 3, 0)]);
        assert_eq!(summary.total_pages, 3);
        assert_eq!(summary.total_links, 8);
        assert_eq!(summary.total_broken_links, 3);
        assert!(summary.has_broken_links());
    }

    #[test]
    fn test_pages_sorted_by_broken_count_with_stable_ties() {
        let summary = CrawlSummary::from_pages(&[
            page("first", 1, 0),
            page("second", 0, 1),
            page("third", 4, 0),
            page("fourth", 0, 3),
            page("fifth", 0, 1),
        ]);
        let order: Vec<_> = summary.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(order, vec!["fourth", "second", "fifth", "first", "third"]);

        // pages without broken links are still reported
        let clean = summary.pages.iter().find(|p| p.url == "third").unwrap();
        assert_eq!(clean.broken_link_count, 0);
        assert_eq!(clean.total_links, 4);
    }

    #[test]
    fn test_summary_json_shape() {
        let mut result = PageResult::new("https://example.com/");
        result.record(
            "https://example.com/down",
            LinkStatus { is_valid: false, status: 0, error: Some("Request timed out".into()) },
        );
        result.record("https://example.com/gone", broken(404));
        let summary = CrawlSummary::from_pages(&[result.finish()]);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalPages": 1,
                "totalLinks": 2,
                "totalBrokenLinks": 2,
                "pages": [{
                    "url": "https://example.com/",
                    "totalLinks": 2,
                    "brokenLinkCount": 2,
                    "brokenLinks": [
                        { "url": "https://example.com/down", "status": 0, "error": "Request timed out" },
                        { "url": "https://example.com/gone", "status": 404 }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_empty_crawl() {
        let summary = CrawlSummary::from_pages(&[]);
        assert_eq!(summary.total_pages, 0);
        assert!(!summary.has_broken_links());
        assert!(summary.pages.is_empty());
    }
}
