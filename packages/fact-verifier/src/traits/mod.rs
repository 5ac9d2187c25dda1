//! Seams to the external collaborators.

pub mod extractor;
pub mod searcher;
pub mod synthesizer;

pub use extractor::DocumentExtractor;
pub use searcher::WebSearcher;
pub use synthesizer::{SynthesisRequest, Synthesizer};
