//! Synthesizer output, raw and parsed.

use serde::{Deserialize, Deserializer, Serialize};

/// Binary verdict on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    True,
    False,
}

impl Verdict {
    /// Normalize free text from a `Verdict` section.
    ///
    /// Strips markdown emphasis and punctuation and looks at the first word
    /// only, so "**False.**" parses but "Mostly false" does not.
    pub fn parse(text: &str) -> Option<Self> {
        let first_word = text
            .split_whitespace()
            .next()?
            .trim_matches(|c: char| !c.is_alphanumeric());

        if first_word.eq_ignore_ascii_case("true") {
            Some(Self::True)
        } else if first_word.eq_ignore_ascii_case("false") {
            Some(Self::False)
        } else {
            None
        }
    }

    pub fn as_bool(self) -> bool {
        matches!(self, Self::True)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => f.write_str("True"),
            Self::False => f.write_str("False"),
        }
    }
}

/// Unmodified synthesizer output for a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictText {
    #[serde(alias = "fact")]
    pub claim: String,

    #[serde(alias = "gemini_output")]
    pub raw_text: String,
}

/// Structured fields scanned out of a [`VerdictText`].
///
/// Absent sections are `None` (or empty for `sources_summary`); that is a
/// tolerated parse miss, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVerdict {
    #[serde(alias = "fact")]
    pub claim: String,

    #[serde(default, deserialize_with = "lenient_verdict")]
    pub verdict: Option<Verdict>,

    #[serde(default)]
    pub collective_summary: Option<String>,

    #[serde(default)]
    pub reasoning: Option<String>,

    #[serde(default)]
    pub sources_summary: Vec<String>,
}

/// Older stores hold the raw section text in `verdict`; normalize on read.
fn lenient_verdict<'de, D>(deserializer: D) -> Result<Option<Verdict>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Verdict::parse))
}
