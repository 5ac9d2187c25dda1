//! HTTP document extractor.
//!
//! Fetches a page, reduces its HTML to text and returns an extractive summary.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::error::DocumentError;
use crate::extractors::summarize::{html_to_text, summarize};
use crate::traits::DocumentExtractor;

/// Sentences kept in each summary.
pub const DEFAULT_SUMMARY_SENTENCES: usize = 5;

/// Bytes of page body read before the rest is ignored.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; FactVerifier/0.1)";

/// Fetches pages over HTTP and summarizes them.
///
/// No request timeout is configured here; the evidence collector bounds each
/// extraction and aborts it when the budget runs out.
pub struct HttpExtractor {
    client: reqwest::Client,
}

impl Default for HttpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpExtractor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn validate_url(url: &str) -> Result<Url, DocumentError> {
        let parsed = Url::parse(url).map_err(|_| DocumentError::InvalidUrl {
            url: url.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            _ => Err(DocumentError::InvalidUrl {
                url: url.to_string(),
            }),
        }
    }

    async fn fetch_html(&self, url: Url) -> Result<String, DocumentError> {
        let url_str = url.to_string();
        debug!(url = %url_str, "HTTP fetch starting");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url_str, error = %e, "HTTP request failed");
                DocumentError::Http {
                    url: url_str.clone(),
                    source: Box::new(e),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase());
        if let Some(content_type) = content_type {
            if !is_textual(&content_type) {
                return Err(DocumentError::UnsupportedContent {
                    url: url_str,
                    content_type,
                });
            }
        }

        read_capped(response, MAX_BODY_BYTES)
            .await
            .map_err(|e| DocumentError::Http {
                url: url_str,
                source: Box::new(e),
            })
    }
}

/// Read at most `limit` bytes of the body, decoding it lossily as UTF-8.
async fn read_capped(mut response: reqwest::Response, limit: usize) -> reqwest::Result<String> {
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            debug!(limit, "Body truncated");
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn is_textual(content_type: &str) -> bool {
    content_type.contains("html") || content_type.starts_with("text/")
}

#[async_trait]
impl DocumentExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> Result<String, DocumentError> {
        let parsed = Self::validate_url(url)?;
        let html = self.fetch_html(parsed).await?;

        let page = html_to_text(&html);
        let summary = summarize(page.title.as_deref(), &page.text, DEFAULT_SUMMARY_SENTENCES);
        if summary.trim().is_empty() {
            return Err(DocumentError::Empty {
                url: url.to_string(),
            });
        }

        debug!(url = %url, chars = summary.chars().count(), "Summarized document");
        Ok(summary)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(HttpExtractor::validate_url("https://example.com/a").is_ok());
        assert!(HttpExtractor::validate_url("http://example.com").is_ok());
        assert!(matches!(
            HttpExtractor::validate_url("ftp://example.com/file"),
            Err(DocumentError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpExtractor::validate_url("not a url"),
            Err(DocumentError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_is_textual() {
        assert!(is_textual("text/html; charset=utf-8"));
        assert!(is_textual("application/xhtml+xml"));
        assert!(is_textual("text/plain"));
        assert!(!is_textual("application/pdf"));
        assert!(!is_textual("image/png"));
    }

    #[tokio::test]
    async fn test_body_read_is_capped() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let body = "a".repeat(10_000);
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: {}\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
        });

        let response = reqwest::get(format!("http://{}/page", addr)).await.unwrap();
        let body = read_capped(response, 1_000).await.unwrap();
        assert_eq!(body.len(), 1_000);
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_network() {
        let extractor = HttpExtractor::new();
        let err = extractor.extract("mailto:someone@example.com").await.unwrap_err();
        assert!(matches!(err, DocumentError::InvalidUrl { .. }));
        assert_eq!(extractor.name(), "http");
    }
}
