//! Durable set of completed claim indices.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreResult;
use crate::stores::atomic::{read_json_or_default, write_json_atomic};

/// Indices of claims whose full pipeline has completed in some run.
///
/// Serialized as a sorted JSON list of integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointSet(BTreeSet<usize>);

impl CheckpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Returns false if the index was already present.
    pub fn insert(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for CheckpointSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Checkpoint file, overwritten wholesale on each save.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty set.
    pub fn load(&self) -> StoreResult<CheckpointSet> {
        let set: CheckpointSet = read_json_or_default(&self.path)?;
        debug!(path = %self.path.display(), done = set.len(), "Loaded checkpoint");
        Ok(set)
    }

    pub fn save(&self, set: &CheckpointSet) -> StoreResult<()> {
        write_json_atomic(&self.path, set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_checkpoint_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("checkpoint.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("checkpoint.json"));

        let mut set = CheckpointSet::new();
        assert!(set.insert(7));
        assert!(set.insert(2));
        assert!(!set.insert(7));
        store.save(&set).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let as_list: Vec<usize> = serde_json::from_str(&raw).unwrap();
        assert_eq!(as_list, vec![2, 7]);

        assert_eq!(store.load().unwrap(), set);
    }

    #[test]
    fn test_reads_unsorted_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        std::fs::write(&path, "[5, 1, 5, 3]").unwrap();

        let set = CheckpointStore::new(&path).load().unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }
}
