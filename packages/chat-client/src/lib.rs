//! Minimal chat completions client
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint (OpenAI,
//! Gemini's OpenAI compatibility layer, local gateways). No domain logic.
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_client::{ChatClient, ChatRequest, Message};
//! use futures::StreamExt;
//!
//! let client = ChatClient::new(api_key).with_base_url(base_url);
//!
//! let mut stream = client
//!     .chat_completion_stream(
//!         ChatRequest::new("gemini-2.0-flash")
//!             .message(Message::system("Be terse."))
//!             .message(Message::user("Is water wet?"))
//!             .temperature(0.0),
//!     )
//!     .await?;
//!
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.delta);
//! }
//! ```

pub mod error;
pub mod streaming;
pub mod types;

pub use error::{ChatError, Result};
pub use streaming::{decode_event_stream, ChatChunk, ChatCompletionStream};
pub use types::*;

use reqwest::{header, Client};
use tracing::{debug, warn};

/// Default API base (OpenAI).
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct ChatClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ChatClient {
    /// Create a client for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        if self.api_key.is_empty() {
            return Err(ChatError::Config("API key is empty".into()));
        }

        let response = self
            .http_client
            .post(self.completions_url())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "chat completion request failed");
                ChatError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "chat completion API error");
            return Err(ChatError::Api(format!("{}: {}", status, error_text)));
        }

        Ok(response)
    }

    /// Streaming chat completion.
    ///
    /// Returns once response headers arrive; fragments are read lazily from
    /// the returned stream.
    pub async fn chat_completion_stream(&self, request: ChatRequest) -> Result<ChatCompletionStream> {
        let mut request = request;
        request.stream = true;

        let body = serde_json::to_value(&request)
            .map_err(|e| ChatError::Parse(format!("failed to serialize request: {}", e)))?;
        let response = self.send(&body).await?;

        debug!(model = %request.model, "chat completion stream opened");
        Ok(Box::pin(decode_event_stream(response.bytes_stream())))
    }
}
