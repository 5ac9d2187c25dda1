//! Server-sent event decoding for streamed chat completions.
//!
//! Turns a raw byte stream into [`ChatChunk`] values. Lines are split on raw
//! bytes before UTF-8 decoding, so a multi-byte character that straddles two
//! network reads is reassembled correctly.

use std::pin::Pin;

use async_stream::try_stream;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;

use crate::error::{ChatError, Result};

/// Boxed stream of decoded chunks, as returned by
/// [`ChatClient::chat_completion_stream`](crate::ChatClient::chat_completion_stream).
pub type ChatCompletionStream = Pin<Box<dyn Stream<Item = Result<ChatChunk>> + Send>>;

/// One decoded event of a streamed completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatChunk {
    /// Text fragment carried by this event (may be empty).
    pub delta: String,
    /// Finish reason reported by the provider on the final content event.
    pub finish_reason: Option<String>,
    /// True for the `data: [DONE]` terminator.
    pub done: bool,
}

impl ChatChunk {
    fn terminator() -> Self {
        Self {
            done: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamEventRaw {
    #[serde(default)]
    choices: Vec<StreamChoiceRaw>,
    #[serde(default)]
    error: Option<StreamErrorRaw>,
}

#[derive(Debug, Deserialize)]
struct StreamChoiceRaw {
    #[serde(default)]
    delta: Option<DeltaRaw>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeltaRaw {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamErrorRaw {
    #[serde(default)]
    message: String,
}

/// Decode an SSE byte stream into chat chunks.
///
/// Transport errors surface as [`ChatError::Network`]; the stream ends after
/// yielding the error.
pub fn decode_event_stream<S, E>(bytes: S) -> impl Stream<Item = Result<ChatChunk>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut pending: Vec<u8> = Vec::new();

        while let Some(piece) = bytes.next().await {
            let piece = piece.map_err(|e| ChatError::Network(e.to_string()))?;
            pending.extend_from_slice(&piece);

            while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = pending.drain(..=pos).collect();
                if let Some(chunk) = parse_event_line(&line)? {
                    yield chunk;
                }
            }
        }

        // Trailing line without a newline terminator
        if let Some(chunk) = parse_event_line(&pending)? {
            yield chunk;
        }
    }
}

/// Parse one SSE line. Comments, blank lines and non-`data` fields yield `None`.
fn parse_event_line(raw: &[u8]) -> Result<Option<ChatChunk>> {
    let line = std::str::from_utf8(raw)
        .map_err(|e| ChatError::Parse(format!("invalid UTF-8 in event stream: {}", e)))?
        .trim();

    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim();

    if data.is_empty() {
        return Ok(None);
    }
    if data == "[DONE]" {
        return Ok(Some(ChatChunk::terminator()));
    }

    let event: StreamEventRaw = serde_json::from_str(data).map_err(|e| {
        ChatError::Parse(format!(
            "failed to parse stream event: {} (data: {})",
            e,
            data.chars().take(200).collect::<String>()
        ))
    })?;

    if let Some(error) = event.error {
        return Err(ChatError::Api(error.message));
    }

    let (delta, finish_reason) = match event.choices.into_iter().next() {
        Some(choice) => (
            choice.delta.and_then(|d| d.content).unwrap_or_default(),
            choice.finish_reason,
        ),
        None => (String::new(), None),
    };

    Ok(Some(ChatChunk {
        delta,
        finish_reason,
        done: false,
    }))
}
