//! Search provider implementations.

pub mod google;

pub use google::GoogleSearcher;
