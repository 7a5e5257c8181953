// src/extractor/mod.rs

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;
use whatlang::Lang;

pub mod datascraper;
use datascraper::page_text_from_html;

use crate::config::FetchConfig;
use crate::error::{ClassifyError, FetchError};

/// Normalized visible text of a single page. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText(String);

impl PageText {
    /// Wraps already reduced text, returning `None` when there is nothing left.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() { None } else { Some(Self(text)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Best guess at the page language, when the text is long enough to tell.
    pub fn language(&self) -> Option<Lang> {
        whatlang::detect(&self.0)
            .filter(|info| info.is_reliable())
            .map(|info| info.lang())
    }
}

/// Why an extraction produced no text.
#[derive(Debug)]
pub enum EmptyReason {
    Fetch(FetchError),
    NoVisibleText,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::Fetch(e) => write!(f, "{}", e),
            EmptyReason::NoVisibleText => f.write_str("no visible text"),
        }
    }
}

/// Outcome of extracting one URL. A failed fetch is not an error at this
/// level; callers decide whether an empty page ends their work.
#[derive(Debug)]
pub enum Extraction {
    Text(PageText),
    Empty(EmptyReason),
}

impl Extraction {
    pub fn into_page(self) -> Result<PageText, ClassifyError> {
        match self {
            Extraction::Text(page) => Ok(page),
            Extraction::Empty(EmptyReason::Fetch(e)) => Err(ClassifyError::Unreachable(e)),
            Extraction::Empty(EmptyReason::NoVisibleText) => Err(ClassifyError::EmptyText),
        }
    }
}

/// Anything that can turn a URL into page text.
#[async_trait]
pub trait PageSource {
    async fn extract(&self, url: &str) -> Extraction;
}

/// Fetches pages over HTTP and reduces them to their visible text.
#[derive(Clone)]
pub struct Extractor {
    client: Client,
    timeout: Duration,
}

impl Extractor {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let timeout = config.timeout();
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout);
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self { client, timeout })
    }

    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status });
        }

        response.text().await.map_err(|e| self.request_error(url, e))
    }

    fn request_error(&self, url: &Url, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout { url: url.to_string(), timeout: self.timeout }
        } else {
            FetchError::Http(error)
        }
    }
}

#[async_trait]
impl PageSource for Extractor {
    /// Performs exactly one GET request. Failures are logged and reported as
    /// an empty extraction.
    async fn extract(&self, url: &str) -> Extraction {
        let parsed = match parse_url(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("{}", e);
                return Extraction::Empty(EmptyReason::Fetch(e));
            }
        };

        match self.fetch(&parsed).await {
            Ok(body_html) => match PageText::new(page_text_from_html(&body_html)) {
                Some(page) => {
                    debug!("Extracted {} words from {}", page.as_str().split(' ').count(), parsed);
                    Extraction::Text(page)
                }
                None => {
                    warn!("No visible text on {}", parsed);
                    Extraction::Empty(EmptyReason::NoVisibleText)
                }
            },
            Err(e) => {
                warn!("{}", e);
                Extraction::Empty(EmptyReason::Fetch(e))
            }
        }
    }
}

/// Parses user input as a URL, assuming `http://` when no scheme is given.
pub fn parse_url(input: &str) -> Result<Url, FetchError> {
    let trimmed = input.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };
    Url::parse(&candidate).map_err(|source| FetchError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers a single request with the given status line and body.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/", addr)
    }

    fn extractor() -> Extractor {
        let config = FetchConfig { use_env_proxy: false, ..Default::default() };
        Extractor::new(&config).unwrap()
    }

    #[tokio::test]
    async fn not_found_yields_empty_extraction() {
        let url = serve_once("404 Not Found", "<html><body>missing page</body></html>").await;

        match extractor().extract(&url).await {
            Extraction::Empty(EmptyReason::Fetch(FetchError::Status { status, .. })) => {
                assert_eq!(status, StatusCode::NOT_FOUND)
            }
            other => panic!("expected a status failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn successful_fetch_yields_visible_text() {
        let url = serve_once(
            "200 OK",
            "<html><head><title>Casino</title></head><body><p>Bet NOW, win BIG!</p></body></html>",
        )
        .await;

        let page = extractor().extract(&url).await.into_page().unwrap();
        assert_eq!(page.as_str(), "bet now win big");
    }

    #[tokio::test]
    async fn page_with_only_hidden_text_is_empty() {
        let body = "<html><head><title>Casino</title></head><body></body></html>";
        let url = serve_once("200 OK", body).await;

        let extraction = extractor().extract(&url).await;
        assert!(matches!(extraction, Extraction::Empty(EmptyReason::NoVisibleText)));
        assert!(matches!(extraction.into_page(), Err(ClassifyError::EmptyText)));
    }

    #[tokio::test]
    async fn refused_connection_is_recovered() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let extraction = extractor().extract(&format!("http://{}/", addr)).await;
        assert!(matches!(extraction.into_page(), Err(ClassifyError::Unreachable(_))));
    }

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(parse_url("example.com").unwrap().as_str(), "http://example.com/");
        assert_eq!(
            parse_url(" https://example.com/a \n").unwrap().as_str(),
            "https://example.com/a"
        );
        assert!(matches!(parse_url("http://"), Err(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn blank_text_is_not_a_page() {
        assert!(PageText::new("   ").is_none());
        assert_eq!(PageText::new("jackpot").unwrap().into_string(), "jackpot");
    }
}
