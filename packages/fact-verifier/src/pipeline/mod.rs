//! Per-item pipeline stages and the batch driver.

pub mod batch;
pub mod collect;
pub mod prompts;
pub mod sections;
pub mod synthesize;

pub use batch::{BatchAccumulator, BatchDriver, ItemState, RunSummary};
pub use collect::EvidenceCollector;
pub use prompts::{render_prompt, SYSTEM_INSTRUCTION};
pub use sections::{extract_bullets, extract_section, parse_verdict};
pub use synthesize::{Synthesized, VerdictAdapter};
