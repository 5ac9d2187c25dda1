//! Chat-completions synthesizer.
//!
//! Streams the completion and assembles it in full before returning. A stream
//! only counts as complete when the provider says so, either with the `[DONE]`
//! terminator or a `stop` finish reason. Anything else is an error, so a
//! half-written verdict never reaches the stores.

use async_trait::async_trait;
use chat_client::{ChatChunk, ChatClient, ChatError, ChatRequest, Message};
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::error::SynthesisError;
use crate::security::Credentials;
use crate::traits::{SynthesisRequest, Synthesizer};

/// Synthesizer backed by any OpenAI-compatible chat completions endpoint.
pub struct ChatSynthesizer {
    client: ChatClient,
    model: String,
}

impl ChatSynthesizer {
    pub fn new(client: ChatClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Client for the configured completion endpoint and key.
    pub fn from_credentials(credentials: &Credentials, model: impl Into<String>) -> Self {
        let client = ChatClient::new(credentials.llm_api_key.expose())
            .with_base_url(&credentials.llm_base_url);
        Self::new(client, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Synthesizer for ChatSynthesizer {
    async fn complete(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        let chat_request = ChatRequest::new(&self.model)
            .message(Message::system(&request.system))
            .message(Message::user(&request.prompt))
            .temperature(request.temperature);

        let stream = self
            .client
            .chat_completion_stream(chat_request)
            .await
            .map_err(provider_error)?;

        let text = assemble_stream(stream).await?;
        debug!(model = %self.model, chars = text.chars().count(), "Synthesis complete");
        Ok(text)
    }
}

fn provider_error(error: ChatError) -> SynthesisError {
    SynthesisError::Provider(error.to_string())
}

/// Concatenate streamed fragments into the full completion text.
pub async fn assemble_stream<S>(stream: S) -> Result<String, SynthesisError>
where
    S: Stream<Item = chat_client::Result<ChatChunk>>,
{
    futures::pin_mut!(stream);

    let mut text = String::new();
    let mut completed = false;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            warn!(received = text.chars().count(), error = %e, "Synthesis stream failed");
            provider_error(e)
        })?;

        if chunk.done {
            completed = true;
            break;
        }

        text.push_str(&chunk.delta);

        match chunk.finish_reason.as_deref() {
            Some("stop") => {
                completed = true;
                break;
            }
            Some(reason) => {
                return Err(SynthesisError::Truncated {
                    reason: reason.to_string(),
                })
            }
            None => {}
        }
    }

    if !completed {
        return Err(SynthesisError::Interrupted {
            received: text.chars().count(),
        });
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SynthesisError::Empty);
    }
    Ok(trimmed.to_string())
}
