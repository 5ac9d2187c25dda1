//! Resumable Fact Verification Pipeline
//!
//! Walks a range of claims from a line-delimited corpus. For each claim it
//! searches the web, summarizes the best pages, asks a completion model for a
//! verdict and persists the results. Progress is checkpointed per claim so an
//! interrupted batch resumes where it stopped.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fact_verifier::{BatchDriver, OutputLayout, VerifierConfig};
//! use fact_verifier::testing::{MockExtractor, MockSearcher, MockSynthesizer};
//! use tokio_util::sync::CancellationToken;
//!
//! let layout = OutputLayout::new("output");
//! let driver = BatchDriver::from_providers(
//!     Arc::new(MockSearcher::new()),
//!     Arc::new(MockExtractor::new()),
//!     Arc::new(MockSynthesizer::default()),
//!     VerifierConfig::default(),
//!     &layout,
//! );
//!
//! let claims = fact_verifier::corpus::load_claims("data/claims.jsonl".as_ref(), 0..10)?;
//! let summary = driver.run(&claims, 0..10, &CancellationToken::new()).await?;
//! println!("{}", summary);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams to the search, extraction and completion services
//! - [`types`] - Claims, evidence and verdict records
//! - [`pipeline`] - Evidence collection, verdict synthesis and the batch driver
//! - [`stores`] - Checkpoint, result stores and failure log
//! - [`searchers`], [`extractors`], [`ai`] - Concrete providers
//! - [`scoring`] - Offline accuracy against corpus labels
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod config;
pub mod corpus;
pub mod error;
pub mod extractors;
pub mod pipeline;
pub mod scoring;
pub mod searchers;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use ai::ChatSynthesizer;
pub use config::{OutputLayout, PersistMode, VerifierConfig};
pub use error::{
    DocumentError, ItemError, SearchError, StoreError, SynthesisError, VerifierError,
};
pub use extractors::HttpExtractor;
pub use pipeline::{
    BatchAccumulator, BatchDriver, EvidenceCollector, ItemState, RunSummary, Synthesized,
    VerdictAdapter,
};
pub use searchers::GoogleSearcher;
pub use security::{Credentials, SecretString};
pub use stores::{CheckpointSet, CheckpointStore, FailureLog, ResultStore, ResultStores};
pub use traits::{DocumentExtractor, SynthesisRequest, Synthesizer, WebSearcher};
pub use types::{
    ClaimItem, EvidenceBundle, EvidenceDocument, LabeledClaim, ParsedVerdict, SearchHit, Verdict,
    VerdictText,
};
