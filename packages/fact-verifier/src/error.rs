//! Typed errors for the verification engine.
//!
//! Errors are split by blast radius: [`DocumentError`] drops one evidence
//! document, [`ItemError`] fails one claim for the current run, and
//! [`VerifierError`] aborts the run.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure to turn one candidate URL into a usable summary.
///
/// Always recoverable: the document is dropped from the candidate set.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// HTTP request failed (connect, TLS, body read)
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Content type is not something we can summarize
    #[error("unsupported content type {content_type} at {url}")]
    UnsupportedContent { url: String, content_type: String },

    /// URL could not be parsed or uses a non-HTTP scheme
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Extraction exceeded its wall-clock budget and was aborted
    #[error("extraction of {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    /// The isolated extraction task panicked or was cancelled
    #[error("extraction worker for {url} failed: {reason}")]
    Worker { url: String, reason: String },

    /// Page had no extractable text
    #[error("no extractable text at {url}")]
    Empty { url: String },
}

/// Failure of the search provider.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("search provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("search response could not be decoded: {0}")]
    Decode(String),

    #[error("search timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of the verdict synthesizer.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Provider rejected the request or failed mid-stream
    #[error("synthesis provider error: {0}")]
    Provider(String),

    /// Stream ended before the provider signalled completion
    #[error("synthesis stream interrupted after {received} characters")]
    Interrupted { received: usize },

    /// Provider stopped for a reason other than natural completion
    #[error("synthesis stopped early: finish reason {reason}")]
    Truncated { reason: String },

    /// Provider completed with no text
    #[error("synthesis returned an empty response")]
    Empty,

    #[error("synthesis timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of one claim's pipeline. Moves the item to FAILED for this run.
#[derive(Debug, Error)]
pub enum ItemError {
    /// Zero documents survived filtering
    #[error("No valid articles found.")]
    NoEvidence,

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Failure reading or writing a durable file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Setup and run-level failures. These abort the run.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("malformed input at line {line} of {path}: {reason}")]
    InputParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("missing credential: {name} is not set")]
    MissingCredential { name: &'static str },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for run-level operations.
pub type Result<T> = std::result::Result<T, VerifierError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for per-item pipeline stages.
pub type ItemResult<T> = std::result::Result<T, ItemError>;
