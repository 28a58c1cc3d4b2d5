// src/crawl/fetch.rs
// =============================================================================
// Downloads a page and hands its anchors to the extractor.
//
// A page only counts if the server answers exactly 200 OK. Anything else
// (redirect left unresolved, 404, 500...) or any network failure comes back
// as a FetchError; the traversal logs it and records the page with no links.
//
// Redirects are followed. The URL the page was finally served from is handed
// back so relative hrefs resolve against it ("/docs" -> "/docs/" turns
// "intro" into "/docs/intro", not "/intro").
// =============================================================================

use reqwest::{Client, StatusCode};
use url::Url;

use crate::checker::{extract_anchors, ExtractedLinks};
use crate::config::CrawlConfig;
use crate::error::FetchError;

/// A successfully downloaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Where the page was served from, after redirects
    pub final_url: Url,
    pub links: ExtractedLinks,
}

/// Fetches pages for the crawl
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.page_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// GETs `url` and extracts its anchor hrefs
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let final_url = response.url().clone();

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        // Parsing is synchronous; the DOM never lives across an await
        Ok(FetchedPage {
            final_url,
            links: extract_anchors(&html),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> PageFetcher {
        PageFetcher::new(&CrawlConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_extracts_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r##"<a href="/a">A</a><a href="#x">x</a>"##, "text/html"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();
        assert_eq!(page.final_url, url);
        assert_eq!(page.links.hrefs, vec!["/a"]);
        assert_eq!(page.links.skipped.len(), 1);
    }

    #[tokio::test]
    async fn test_reports_url_after_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/docs/"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/docs/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"<a href="intro">Intro</a>"#, "text/html"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/docs", server.uri())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();
        assert_eq!(page.final_url.as_str(), format!("{}/docs/", server.uri()));
        assert_eq!(page.links.hrefs, vec!["intro"]);
    }

    #[tokio::test]
    async fn test_non_ok_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_raw(r#"<a href="/a">A</a>"#, "text/html"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let missing = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        assert_eq!(fetcher().fetch(&missing).await, Err(FetchError::Status(404)));

        let empty = Url::parse(&format!("{}/empty", server.uri())).unwrap();
        assert_eq!(fetcher().fetch(&empty).await, Err(FetchError::Status(204)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();
        assert!(matches!(fetcher().fetch(&url).await, Err(FetchError::Transport(_))));
    }
}
