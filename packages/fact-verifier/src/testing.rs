//! Testing utilities including mock implementations.
//!
//! These let the pipeline run end to end without network access or a
//! completion service. Every mock records its calls for assertions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{DocumentError, SearchError, SynthesisError};
use crate::traits::{DocumentExtractor, SynthesisRequest, Synthesizer, WebSearcher};
use crate::types::SearchHit;

/// Text of exactly `chars` characters, for length-filter tests.
pub fn filler_text(chars: usize) -> String {
    "evidence ".chars().cycle().take(chars).collect()
}

/// A mock search provider with canned hits per query.
#[derive(Default, Clone)]
pub struct MockSearcher {
    results: Arc<RwLock<HashMap<String, Vec<SearchHit>>>>,
    failing: bool,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A searcher whose every call fails with an HTTP 500.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Canned hits returned for `query`.
    pub fn with_results(self, query: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        self.results.write().unwrap().insert(query.into(), hits);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.write().unwrap().push(query.to_string());

        if self.failing {
            return Err(SearchError::Status {
                status: 500,
                body: "mock failure".to_string(),
            });
        }

        Ok(self
            .results
            .read()
            .unwrap()
            .get(query)
            .map(|hits| hits.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

/// Scripted behavior of [`MockExtractor`] for one URL.
#[derive(Debug, Clone)]
pub enum ExtractOutcome {
    /// Return this summary
    Summary(String),
    /// Fail with an HTTP 403
    Fail,
    /// Sleep this long, then return a long summary
    Hang(Duration),
    /// Panic inside the extraction
    Panic,
}

/// A mock document extractor scripted per URL.
///
/// URLs without a script fail with an HTTP 404.
#[derive(Default, Clone)]
pub struct MockExtractor {
    outcomes: Arc<RwLock<HashMap<String, ExtractOutcome>>>,
    calls: Arc<RwLock<Vec<String>>>,
    finished: Arc<RwLock<Vec<String>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(self, url: impl Into<String>, outcome: ExtractOutcome) -> Self {
        self.outcomes.write().unwrap().insert(url.into(), outcome);
        self
    }

    pub fn with_summary(self, url: impl Into<String>, summary: impl Into<String>) -> Self {
        self.with_outcome(url, ExtractOutcome::Summary(summary.into()))
    }

    /// URLs extraction was started for, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// URLs whose extraction ran to completion (aborted ones never appear).
    pub fn finished(&self) -> Vec<String> {
        self.finished.read().unwrap().clone()
    }
}

#[async_trait]
impl DocumentExtractor for MockExtractor {
    async fn extract(&self, url: &str) -> Result<String, DocumentError> {
        self.calls.write().unwrap().push(url.to_string());
        let outcome = self.outcomes.read().unwrap().get(url).cloned();

        let result = match outcome {
            Some(ExtractOutcome::Summary(summary)) => Ok(summary),
            Some(ExtractOutcome::Fail) => Err(DocumentError::Status {
                url: url.to_string(),
                status: 403,
            }),
            Some(ExtractOutcome::Hang(duration)) => {
                tokio::time::sleep(duration).await;
                Ok(filler_text(1000))
            }
            Some(ExtractOutcome::Panic) => panic!("mock extractor panicked on {}", url),
            None => Err(DocumentError::Status {
                url: url.to_string(),
                status: 404,
            }),
        };

        self.finished.write().unwrap().push(url.to_string());
        result
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock synthesizer returning canned text.
///
/// Per-claim responses are matched by the claim text appearing in the
/// prompt; everything else gets the default response.
#[derive(Clone)]
pub struct MockSynthesizer {
    default_response: Result<String, String>,
    responses: Arc<RwLock<Vec<(String, Result<String, String>)>>>,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<SynthesisRequest>>>,
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new("**Verdict:** True\n**Collective Summary:** mock\n**Reasoning:** mock\n**Sources Summary:**\n- mock")
    }
}

impl MockSynthesizer {
    pub fn new(default_response: impl Into<String>) -> Self {
        Self {
            default_response: Ok(default_response.into()),
            responses: Arc::default(),
            delay: None,
            calls: Arc::default(),
        }
    }

    /// A synthesizer whose every call fails with a provider error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default_response: Err(message.into()),
            ..Self::default()
        }
    }

    pub fn with_response(self, claim: impl Into<String>, text: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .push((claim.into(), Ok(text.into())));
        self
    }

    pub fn with_failure(self, claim: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .push((claim.into(), Err(message.into())));
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<SynthesisRequest> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn complete(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        self.calls.write().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .responses
            .read()
            .unwrap()
            .iter()
            .find(|(claim, _)| request.prompt.contains(claim.as_str()))
            .map(|(_, response)| response.clone());

        scripted
            .unwrap_or_else(|| self.default_response.clone())
            .map_err(SynthesisError::Provider)
    }
}
