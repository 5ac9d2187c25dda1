//! Input claims.

use serde::{Deserialize, Serialize};

/// One claim from the input corpus.
///
/// `index` is the zero-based line position in the corpus and is the identity
/// used for checkpointing. `text` is the identity used for result dedup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimItem {
    pub index: usize,
    pub text: String,
}

impl ClaimItem {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// First `max_chars` characters of the claim, for log lines.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }
}

/// A corpus line with its ground-truth label, as used by offline scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledClaim {
    #[serde(alias = "claim")]
    pub statement: String,

    /// Corpus label, e.g. "true", "mostly-true", "pants-fire"
    #[serde(default)]
    pub verdict: Option<String>,
}
