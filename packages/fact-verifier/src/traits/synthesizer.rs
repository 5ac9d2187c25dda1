//! Verdict synthesizer trait.

use async_trait::async_trait;

use crate::error::SynthesisError;

/// A single completion request: fixed system instruction plus rendered prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
}

/// Black-box text completion service.
///
/// Returns the complete generated text. Implementations that stream must
/// assemble fragments internally and report incomplete streams as errors.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn complete(&self, request: &SynthesisRequest) -> Result<String, SynthesisError>;
}
