//! Durable stores: checkpoint set, result stores and failure log.
//!
//! All structured stores are pretty-printed JSON documents replaced
//! atomically, so a crash mid-write leaves the previous version intact.

pub mod atomic;
pub mod checkpoint;
pub mod failure_log;
pub mod results;

pub use checkpoint::{CheckpointSet, CheckpointStore};
pub use failure_log::FailureLog;
pub use results::{merge_dedup, ResultStore, ResultStores, StoreKind, StoreRecord};
