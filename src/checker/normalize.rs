// src/checker/normalize.rs
// =============================================================================
// Turns raw href strings into absolute http(s) URLs, or explains why not.
//
// Resolution order for a trimmed href:
//   ""               -> skipped (blank)
//   "#..."           -> skipped (anchor)
//   "javascript:..." -> skipped (javascript)
//   "mailto:/tel:"   -> skipped (invalid, not navigable)
//   "/..."           -> joined onto the crawl origin
//   "http(s)://..."  -> parsed as-is and re-serialized
//   anything else    -> joined onto the URL of the page it was found on
//
// Whatever comes out must be http or https, otherwise it is skipped too.
// Nothing in here panics or returns an error: a bad href is data, not a
// reason to stop crawling.
//
// The same module holds the two predicates the traversal needs:
// looks_like_html (should we crawl it?) and is_same_domain (may we crawl it?).
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Why an href was not treated as a checkable link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    /// Empty (or whitespace-only) href
    Blank,
    /// In-page fragment like "#top"
    Anchor,
    /// "javascript:" pseudo-URL
    Javascript,
    /// mailto:/tel:, unparseable, or not http(s) after resolution
    Invalid,
}

impl SkipReason {
    /// Reasons that can be decided from the raw href alone, before any
    /// resolution. Page extraction uses this so the original href is kept.
    pub fn from_raw(trimmed: &str) -> Option<SkipReason> {
        if trimmed.is_empty() {
            Some(SkipReason::Blank)
        } else if trimmed.starts_with('#') {
            Some(SkipReason::Anchor)
        } else if starts_with_ignore_case(trimmed, "javascript:") {
            Some(SkipReason::Javascript)
        } else {
            None
        }
    }
}

/// Outcome of classifying one href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Link(Url),
    Skip(SkipReason),
}

/// Resolves `raw` found on `page_url` into an absolute http(s) URL.
///
/// `base_origin` is the crawl target's origin; root-relative hrefs resolve
/// against it rather than against the page.
pub fn classify_href(raw: &str, base_origin: &Url, page_url: &Url) -> Classification {
    let href = raw.trim();

    if let Some(reason) = SkipReason::from_raw(href) {
        return Classification::Skip(reason);
    }

    if starts_with_ignore_case(href, "mailto:") || starts_with_ignore_case(href, "tel:") {
        return Classification::Skip(SkipReason::Invalid);
    }

    let resolved = if href.starts_with('/') {
        base_origin.join(href)
    } else if href.starts_with("http://") || href.starts_with("https://") {
        Url::parse(href)
    } else {
        page_url.join(href)
    };

    match resolved {
        Ok(url) if is_http(&url) => Classification::Link(url),
        _ => Classification::Skip(SkipReason::Invalid),
    }
}

/// True for http and https URLs
pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Same-domain check used to scope the crawl.
///
/// Only hostnames are compared: http vs https or a different port on the
/// same host still counts as the same site.
pub fn is_same_domain(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

// File extensions that almost never serve an HTML page
const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "tif", "tiff", "avif",
    // archives
    "zip", "tar", "gz", "tgz", "bz2", "xz", "rar", "7z",
    // audio / video
    "mp3", "wav", "ogg", "flac", "aac", "m4a", "mp4", "m4v", "mov", "avi", "mkv", "webm",
    "wmv", "flv",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // stylesheets and scripts
    "css", "js", "mjs", "map",
    // structured data
    "json", "xml", "csv", "yaml", "yml",
];

/// Best-effort "is this a page or a static asset?" heuristic.
///
/// Looks only at the extension of the last path segment. Extensions on the
/// deny list are treated as assets unless they are also on the allow list.
/// Anything without an extension, or with one we don't know, is assumed to
/// be HTML.
#[derive(Debug, Clone)]
pub struct AssetFilter {
    deny: HashSet<String>,
    allow: HashSet<String>,
}

impl Default for AssetFilter {
    fn default() -> Self {
        Self {
            deny: DEFAULT_ASSET_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            allow: HashSet::new(),
        }
    }
}

impl AssetFilter {
    /// Adds extensions (with or without a leading dot) that mark assets
    pub fn deny<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.deny.extend(extensions.into_iter().map(|ext| clean_extension(ext.as_ref())));
        self
    }

    /// Adds extensions that should always be crawled, even if denied
    pub fn allow<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allow.extend(extensions.into_iter().map(|ext| clean_extension(ext.as_ref())));
        self
    }

    pub fn looks_like_html(&self, url: &Url) -> bool {
        let last_segment = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("");

        let Some((_, extension)) = last_segment.rsplit_once('.') else {
            return true;
        };
        let extension = extension.to_ascii_lowercase();

        self.allow.contains(&extension) || !self.deny.contains(&extension)
    }
}

fn clean_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    fn classify(raw: &str, page: &str) -> Classification {
        classify_href(raw, &base(), &Url::parse(page).unwrap())
    }

    fn link(raw: &str, page: &str) -> String {
        match classify(raw, page) {
            Classification::Link(url) => url.to_string(),
            other => panic!("expected a link for {raw:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_absolute_urls_are_canonicalized() {
        let page = "https://example.com/x";
        assert_eq!(link("https://example.com", page), "https://example.com/");
        assert_eq!(link("HTTPS://Example.COM/a/../b", page), "https://example.com/b");
        assert_eq!(link("http://other.org:80/path?q=1", page), "http://other.org/path?q=1");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let page = "https://example.com/x";
        for input in [
            "https://example.com/a/b?c=d#e",
            "http://example.org/",
            "https://sub.example.com:8443/deep/path/",
        ] {
            let once = link(input, page);
            assert_eq!(link(&once, page), once);
            assert_eq!(once, Url::parse(input).unwrap().to_string());
        }
    }

    #[test]
    fn test_root_relative_ignores_page_path() {
        assert_eq!(link("/a/b", "https://example.com/x"), "https://example.com/a/b");
        assert_eq!(
            link("/a/b", "https://example.com/deep/nested/page.html"),
            "https://example.com/a/b"
        );
    }

    #[test]
    fn test_protocol_relative_uses_origin_scheme() {
        assert_eq!(link("//cdn.example.net/lib", "https://example.com/x"), "https://cdn.example.net/lib");
    }

    #[test]
    fn test_page_relative_resolution() {
        assert_eq!(link("about", "https://example.com/docs/intro"), "https://example.com/docs/about");
        assert_eq!(link("../up", "https://example.com/docs/guide/"), "https://example.com/docs/up");
        assert_eq!(link("?page=2", "https://example.com/list"), "https://example.com/list?page=2");
    }

    #[test]
    fn test_non_navigable_hrefs_are_skipped() {
        let page = "https://example.com/x";
        assert_eq!(classify("", page), Classification::Skip(SkipReason::Blank));
        assert_eq!(classify("   ", page), Classification::Skip(SkipReason::Blank));
        assert_eq!(classify("#section", page), Classification::Skip(SkipReason::Anchor));
        assert_eq!(classify("JavaScript:void(0)", page), Classification::Skip(SkipReason::Javascript));
        assert_eq!(classify("mailto:x@y.com", page), Classification::Skip(SkipReason::Invalid));
        assert_eq!(classify("tel:+1234", page), Classification::Skip(SkipReason::Invalid));
        assert_eq!(classify("MAILTO:x@y.com", page), Classification::Skip(SkipReason::Invalid));
    }

    #[test]
    fn test_non_http_schemes_are_invalid() {
        let page = "https://example.com/x";
        assert_eq!(classify("ftp://files.example.com/a", page), Classification::Skip(SkipReason::Invalid));
        assert_eq!(classify("data:text/plain,hi", page), Classification::Skip(SkipReason::Invalid));
        assert_eq!(classify("http://[::1", page), Classification::Skip(SkipReason::Invalid));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(link("  /docs  ", "https://example.com/"), "https://example.com/docs");
    }

    #[test]
    fn test_same_domain_compares_hosts_only() {
        let a = Url::parse("https://example.com/a").unwrap();
        assert!(is_same_domain(&a, &Url::parse("http://example.com:8080/b").unwrap()));
        assert!(!is_same_domain(&a, &Url::parse("https://www.example.com/").unwrap()));
        assert!(!is_same_domain(&a, &Url::parse("mailto:x@example.com").unwrap()));
    }

    #[test]
    fn test_asset_filter_defaults() {
        let filter = AssetFilter::default();
        let html = |s: &str| filter.looks_like_html(&Url::parse(s).unwrap());

        assert!(html("https://example.com/"));
        assert!(html("https://example.com/about"));
        assert!(html("https://example.com/index.html"));
        assert!(html("https://example.com/page.php?id=3"));
        assert!(html("https://example.com/v1.2/notes"));
        assert!(!html("https://example.com/logo.PNG"));
        assert!(!html("https://example.com/static/app.js"));
        assert!(!html("https://example.com/feed.xml"));
        assert!(!html("https://example.com/release.tar.gz"));
    }

    #[test]
    fn test_asset_filter_is_tunable() {
        let filter = AssetFilter::default().deny([".pdf"]).allow(["XML"]);
        assert!(!filter.looks_like_html(&Url::parse("https://example.com/paper.pdf").unwrap()));
        assert!(filter.looks_like_html(&Url::parse("https://example.com/sitemap.xml").unwrap()));
    }
}
