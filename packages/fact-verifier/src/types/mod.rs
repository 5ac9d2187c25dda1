//! Data model for claims, evidence and verdicts.

pub mod claim;
pub mod evidence;
pub mod verdict;

pub use claim::{ClaimItem, LabeledClaim};
pub use evidence::{EvidenceBundle, EvidenceDocument, SearchHit};
pub use verdict::{ParsedVerdict, Verdict, VerdictText};
