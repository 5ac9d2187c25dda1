//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate so API keys never reach logs or debug output.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::{Result, VerifierError};

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value. Only call this at the point of use.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Default completion endpoint: Gemini's OpenAI-compatible API.
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Credentials for the search provider and the completion service.
#[derive(Clone)]
pub struct Credentials {
    /// Google API key for Custom Search
    pub search_api_key: SecretString,

    /// Programmable Search Engine id (`cx`)
    pub search_engine_id: String,

    /// Completion service API key
    pub llm_api_key: SecretString,

    /// OpenAI-compatible completion endpoint
    pub llm_base_url: String,
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// `GOOGLE_API_KEY`, `GOOGLE_CSE_ID`, and `GEMINI_API_KEY` (or
    /// `OPENAI_API_KEY`) are required; `LLM_BASE_URL` is optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup (tests, config files).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let search_api_key = get("GOOGLE_API_KEY").ok_or(VerifierError::MissingCredential {
            name: "GOOGLE_API_KEY",
        })?;
        let search_engine_id = get("GOOGLE_CSE_ID").ok_or(VerifierError::MissingCredential {
            name: "GOOGLE_CSE_ID",
        })?;
        let llm_api_key = get("GEMINI_API_KEY")
            .or_else(|| get("OPENAI_API_KEY"))
            .ok_or(VerifierError::MissingCredential {
                name: "GEMINI_API_KEY",
            })?;
        let llm_base_url = get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());

        Ok(Self {
            search_api_key: SecretString::new(search_api_key),
            search_engine_id,
            llm_api_key: SecretString::new(llm_api_key),
            llm_base_url,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("search_api_key", &"[REDACTED]")
            .field("search_engine_id", &self.search_engine_id)
            .field("llm_api_key", &"[REDACTED]")
            .field("llm_base_url", &self.llm_base_url)
            .finish()
    }
}
