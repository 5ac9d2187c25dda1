//! Append-only log of failed items.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::types::ClaimItem;

/// Characters of claim text quoted in each failure line.
pub const EXCERPT_CHARS: usize = 100;

/// One line per failure: `[index] <claim prefix>... → <error>`.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format_line(item: &ClaimItem, error: &dyn std::fmt::Display) -> String {
        // Keep one record per line even if the error spans several
        let message = error.to_string().replace('\n', " ");
        format!("[{}] {}... → {}", item.index, item.excerpt(EXCERPT_CHARS), message)
    }

    pub fn append(&self, item: &ClaimItem, error: &dyn std::fmt::Display) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        writeln!(file, "{}", Self::format_line(item, error)).map_err(|e| StoreError::io(&self.path, e))
    }
}
