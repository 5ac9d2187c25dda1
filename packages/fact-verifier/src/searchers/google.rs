//! Google Custom Search JSON API searcher.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::MAX_SEARCH_RESULTS;
use crate::error::SearchError;
use crate::security::SecretString;
use crate::traits::searcher::WebSearcher;
use crate::types::SearchHit;

const ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Searcher backed by a Programmable Search Engine.
pub struct GoogleSearcher {
    api_key: SecretString,
    engine_id: String,
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleSearcher {
    pub fn new(api_key: SecretString, engine_id: impl Into<String>) -> Self {
        Self {
            api_key,
            engine_id: engine_id.into(),
            client: reqwest::Client::new(),
            endpoint: ENDPOINT.to_string(),
        }
    }

    /// Override the API endpoint (for a local stub server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl WebSearcher for GoogleSearcher {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let num = limit.clamp(1, MAX_SEARCH_RESULTS).to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.expose()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            // The request URL carries the API key in its query string
            .map_err(|e| SearchError::Http(Box::new(e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Custom Search API error");
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.without_url().to_string()))?;

        let hits: Vec<SearchHit> = parsed
            .items
            .into_iter()
            .take(limit)
            .map(|item| SearchHit::new(item.title, item.link, item.snippet))
            .collect();

        debug!(hits = hits.len(), "search completed");
        Ok(hits)
    }
}
