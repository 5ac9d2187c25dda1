//! Search hits and evidence bundles.

use serde::{Deserialize, Serialize};

/// A candidate document as returned by the search provider, in rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// A search hit whose page was extracted and passed the length filter.
///
/// Only constructed by the evidence collector, so `summary` is always a
/// qualifying, non-empty extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceDocument {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub summary: String,
}

impl EvidenceDocument {
    pub fn from_hit(hit: SearchHit, summary: String) -> Self {
        Self {
            title: hit.title,
            url: hit.url,
            snippet: hit.snippet,
            summary,
        }
    }
}

/// The kept evidence for one claim, in provider rank order, at most `top_k` long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceBundle {
    #[serde(alias = "fact")]
    pub claim: String,

    #[serde(alias = "articles")]
    pub documents: Vec<EvidenceDocument>,
}
