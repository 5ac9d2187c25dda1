//! Synthesizer implementations.

pub mod chat;

pub use chat::{assemble_stream, ChatSynthesizer};
