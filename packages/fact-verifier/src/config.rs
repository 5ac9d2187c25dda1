//! Configuration for a verification run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerifierError};

/// Maximum results the Custom Search API returns per request.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// When batch results are merged into the durable stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistMode {
    /// Merge results, then save the checkpoint, after every completed item.
    #[default]
    PerItem,

    /// Save the checkpoint per item; merge results once when the run ends.
    ///
    /// A crash mid-run loses the results of items already checkpointed.
    EndOfRun,
}

/// Tunables for evidence collection, synthesis and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Results requested from the search provider per claim. Default: 10.
    pub search_results: usize,

    /// Maximum evidence documents kept per claim. Default: 6.
    pub top_k: usize,

    /// Minimum trimmed summary length, in characters. Default: 200.
    pub min_summary_chars: usize,

    /// Hard wall-clock budget for one document extraction. Default: 10s.
    pub extraction_timeout: Duration,

    /// Delay between consecutive document fetches. Default: 1s.
    pub fetch_pacing: Duration,

    /// Default: per item.
    #[serde(default)]
    pub persist_mode: PersistMode,

    /// Completion model. Default: "gemini-2.0-flash".
    pub model: String,

    /// Sampling temperature for synthesis. Default: 0.0.
    pub temperature: f32,

    /// Optional bound on the search call. Default: none.
    #[serde(default)]
    pub search_timeout: Option<Duration>,

    /// Optional bound on the synthesis call. Default: none.
    #[serde(default)]
    pub synthesis_timeout: Option<Duration>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            search_results: MAX_SEARCH_RESULTS,
            top_k: 6,
            min_summary_chars: 200,
            extraction_timeout: Duration::from_secs(10),
            fetch_pacing: Duration::from_secs(1),
            persist_mode: PersistMode::PerItem,
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.0,
            search_timeout: None,
            synthesis_timeout: None,
        }
    }
}

impl VerifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_results(mut self, count: usize) -> Self {
        self.search_results = count;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_summary_chars(mut self, chars: usize) -> Self {
        self.min_summary_chars = chars;
        self
    }

    pub fn with_extraction_timeout(mut self, timeout: Duration) -> Self {
        self.extraction_timeout = timeout;
        self
    }

    pub fn with_fetch_pacing(mut self, pacing: Duration) -> Self {
        self.fetch_pacing = pacing;
        self
    }

    pub fn with_persist_mode(mut self, mode: PersistMode) -> Self {
        self.persist_mode = mode;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_search_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.search_timeout = timeout;
        self
    }

    pub fn with_synthesis_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    /// Reject settings that would make every item fail or the provider refuse.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(VerifierError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.top_k == 0 {
            return invalid("top_k must be at least 1");
        }
        if self.search_results == 0 || self.search_results > MAX_SEARCH_RESULTS {
            return invalid("search_results must be between 1 and 10");
        }
        if self.extraction_timeout.is_zero() {
            return invalid("extraction_timeout must be non-zero");
        }
        if self.model.trim().is_empty() {
            return invalid("model must be set");
        }
        Ok(())
    }
}

/// Durable file locations, all under one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn checkpoint(&self) -> PathBuf {
        self.dir.join("checkpoint.json")
    }

    pub fn failure_log(&self) -> PathBuf {
        self.dir.join("error_log.txt")
    }

    pub fn comparison(&self) -> PathBuf {
        self.dir.join("verdict_comparison.json")
    }

    /// Path of a result store file by name.
    pub fn store(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
