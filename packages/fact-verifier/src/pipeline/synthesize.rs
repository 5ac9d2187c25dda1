//! Verdict synthesis for one evidence bundle.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::VerifierConfig;
use crate::error::{ItemResult, SynthesisError};
use crate::pipeline::prompts::{render_prompt, SYSTEM_INSTRUCTION};
use crate::pipeline::sections::parse_verdict;
use crate::traits::{SynthesisRequest, Synthesizer};
use crate::types::{EvidenceBundle, ParsedVerdict, VerdictText};

/// Raw and parsed synthesizer output for one claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesized {
    pub text: VerdictText,
    pub parsed: ParsedVerdict,
}

/// Renders the prompt, calls the synthesizer and parses the reply.
pub struct VerdictAdapter {
    synthesizer: Arc<dyn Synthesizer>,
    temperature: f32,
    timeout: Option<Duration>,
}

impl VerdictAdapter {
    pub fn new(synthesizer: Arc<dyn Synthesizer>, config: &VerifierConfig) -> Self {
        Self {
            synthesizer,
            temperature: config.temperature,
            timeout: config.synthesis_timeout,
        }
    }

    pub fn request(&self, bundle: &EvidenceBundle) -> SynthesisRequest {
        SynthesisRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: render_prompt(bundle),
            temperature: self.temperature,
        }
    }

    pub async fn synthesize(&self, bundle: &EvidenceBundle) -> ItemResult<Synthesized> {
        let request = self.request(bundle);

        let completion = self.synthesizer.complete(&request);
        let raw_text = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, completion)
                .await
                .map_err(|_| SynthesisError::Timeout(limit))??,
            None => completion.await?,
        };

        let text = VerdictText {
            claim: bundle.claim.clone(),
            raw_text,
        };
        let parsed = parse_verdict(&text);
        debug!(verdict = ?parsed.verdict, "Parsed synthesizer output");

        Ok(Synthesized { text, parsed })
    }
}
