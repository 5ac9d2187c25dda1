//! Document extractor implementations.

pub mod http;
pub mod summarize;

pub use http::HttpExtractor;
pub use summarize::{html_to_text, summarize, PageText};
