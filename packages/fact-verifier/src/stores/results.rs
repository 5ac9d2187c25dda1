//! Result stores with first-wins merge by claim text.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::OutputLayout;
use crate::error::StoreResult;
use crate::stores::atomic::{read_json_or_default, write_json_atomic};
use crate::types::{EvidenceBundle, ParsedVerdict, VerdictText};

/// The three parallel result sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Evidence,
    RawVerdict,
    ParsedVerdict,
}

impl StoreKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Evidence => "fact_results.json",
            Self::RawVerdict => "full_output.json",
            Self::ParsedVerdict => "parsed_output.json",
        }
    }
}

/// A record keyed by claim text for deduplication.
pub trait StoreRecord: Serialize + DeserializeOwned + Clone + Send + Sync {
    const KIND: StoreKind;

    fn claim(&self) -> &str;
}

impl StoreRecord for EvidenceBundle {
    const KIND: StoreKind = StoreKind::Evidence;

    fn claim(&self) -> &str {
        &self.claim
    }
}

impl StoreRecord for VerdictText {
    const KIND: StoreKind = StoreKind::RawVerdict;

    fn claim(&self) -> &str {
        &self.claim
    }
}

impl StoreRecord for ParsedVerdict {
    const KIND: StoreKind = StoreKind::ParsedVerdict;

    fn claim(&self) -> &str {
        &self.claim
    }
}

/// Concatenate `existing` then `new`, keeping the first record per claim.
///
/// Existing records win over new ones, and merging the same batch twice
/// leaves the result unchanged.
pub fn merge_dedup<T: StoreRecord>(existing: Vec<T>, new: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut merged: IndexMap<String, T> = IndexMap::new();
    for record in existing.into_iter().chain(new) {
        if let Entry::Vacant(slot) = merged.entry(record.claim().to_string()) {
            slot.insert(record);
        }
    }
    merged.into_values().collect()
}

/// One durable result file holding records of type `T`.
#[derive(Debug, Clone)]
pub struct ResultStore<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: StoreRecord> ResultStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// The store for `T` under an output directory.
    pub fn in_layout(layout: &OutputLayout) -> Self {
        Self::new(layout.store(T::KIND.file_name()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty store.
    pub fn load(&self) -> StoreResult<Vec<T>> {
        read_json_or_default(&self.path)
    }

    /// Re-read the file, merge `new_records` behind it and replace it.
    ///
    /// Returns how many records the merge added.
    pub fn merge_and_save(&self, new_records: &[T]) -> StoreResult<usize> {
        if new_records.is_empty() {
            return Ok(0);
        }

        let existing = self.load()?;
        let before = existing.len();
        let merged = merge_dedup(existing, new_records.iter().cloned());
        write_json_atomic(&self.path, &merged)?;

        let added = merged.len().saturating_sub(before);
        debug!(
            store = T::KIND.file_name(),
            added,
            total = merged.len(),
            "Merged result store"
        );
        Ok(added)
    }
}

/// The evidence, raw verdict and parsed verdict stores of one output directory.
#[derive(Debug, Clone)]
pub struct ResultStores {
    pub evidence: ResultStore<EvidenceBundle>,
    pub raw: ResultStore<VerdictText>,
    pub parsed: ResultStore<ParsedVerdict>,
}

impl ResultStores {
    pub fn in_layout(layout: &OutputLayout) -> Self {
        Self {
            evidence: ResultStore::in_layout(layout),
            raw: ResultStore::in_layout(layout),
            parsed: ResultStore::in_layout(layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(claim: &str, raw: &str) -> VerdictText {
        VerdictText {
            claim: claim.to_string(),
            raw_text: raw.to_string(),
        }
    }

    fn record_strategy() -> impl Strategy<Value = VerdictText> {
        ("[a-d]", "[a-z]{0,3}").prop_map(|(claim, raw)| text(&claim, &raw))
    }

    #[test]
    fn test_existing_record_wins() {
        let merged = merge_dedup(
            vec![text("a", "old"), text("b", "old")],
            vec![text("a", "new"), text("c", "new")],
        );
        assert_eq!(merged, vec![text("a", "old"), text("b", "old"), text("c", "new")]);
    }

    #[test]
    fn test_merge_and_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let stores = ResultStores::in_layout(&layout);
        assert_eq!(stores.raw.path(), dir.path().join("full_output.json"));

        assert_eq!(stores.raw.merge_and_save(&[text("a", "1")]).unwrap(), 1);
        assert_eq!(stores.raw.merge_and_save(&[text("a", "2"), text("b", "1")]).unwrap(), 1);
        assert_eq!(stores.raw.merge_and_save(&[]).unwrap(), 0);

        assert_eq!(stores.raw.load().unwrap(), vec![text("a", "1"), text("b", "1")]);
        assert!(stores.parsed.load().unwrap().is_empty());
    }

    #[test]
    fn test_reads_legacy_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fact_results.json");
        std::fs::write(
            &path,
            r#"[{"fact": "f", "articles": [{"title": "t", "url": "u", "snippet": "s", "summary": "m"}]}]"#,
        )
        .unwrap();

        let loaded = ResultStore::<EvidenceBundle>::new(&path).load().unwrap();
        assert_eq!(loaded[0].claim, "f");
        assert_eq!(loaded[0].documents[0].summary, "m");
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(
            existing in prop::collection::vec(record_strategy(), 0..8),
            new in prop::collection::vec(record_strategy(), 0..8),
        ) {
            let once = merge_dedup(existing, new.clone());
            let twice = merge_dedup(once.clone(), new);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn merge_prefers_existing(
            existing in prop::collection::vec(record_strategy(), 1..8),
            new in prop::collection::vec(record_strategy(), 0..8),
        ) {
            let merged = merge_dedup(existing.clone(), new);
            for record in &merged {
                if let Some(first) = existing.iter().find(|r| r.claim == record.claim) {
                    prop_assert_eq!(record, first);
                }
            }
            let mut claims: Vec<&str> = merged.iter().map(|r| r.claim.as_str()).collect();
            let total = claims.len();
            claims.sort_unstable();
            claims.dedup();
            prop_assert_eq!(claims.len(), total);
        }
    }
}
