//! Line-delimited JSON input corpus.
//!
//! The zero-based line position is a claim's stable index, so blank lines
//! still consume an index.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, VerifierError};
use crate::types::{ClaimItem, LabeledClaim};

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path).map(BufReader::new).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            VerifierError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            VerifierError::InputParse {
                path: path.to_path_buf(),
                line: 0,
                reason: e.to_string(),
            }
        }
    })
}

fn parse_line(path: &Path, index: usize, line: &str) -> Result<LabeledClaim> {
    serde_json::from_str(line).map_err(|e| VerifierError::InputParse {
        path: path.to_path_buf(),
        line: index,
        reason: e.to_string(),
    })
}

/// Walk non-blank lines whose index falls in `range`, calling `visit` with
/// each line's index and text.
///
/// Lines are split as raw bytes; only lines inside the range are decoded.
fn for_each_line(
    path: &Path,
    range: Range<usize>,
    mut visit: impl FnMut(usize, &str) -> Result<()>,
) -> Result<()> {
    for (index, line) in open(path)?.split(b'\n').enumerate() {
        if index >= range.end {
            break;
        }
        let line = line.map_err(|e| VerifierError::InputParse {
            path: path.to_path_buf(),
            line: index,
            reason: e.to_string(),
        })?;
        if index < range.start {
            continue;
        }
        let text = std::str::from_utf8(&line).map_err(|e| VerifierError::InputParse {
            path: path.to_path_buf(),
            line: index,
            reason: e.to_string(),
        })?;
        let text = text.strip_suffix('\r').unwrap_or(text);
        if text.trim().is_empty() {
            continue;
        }
        visit(index, text)?;
    }
    Ok(())
}

/// Load the claims whose line index falls in `range`.
///
/// Lines outside the range are not parsed.
pub fn load_claims(path: &Path, range: Range<usize>) -> Result<Vec<ClaimItem>> {
    let mut claims = Vec::new();
    for_each_line(path, range, |index, line| {
        let record = parse_line(path, index, line)?;
        claims.push(ClaimItem::new(index, record.statement));
        Ok(())
    })?;

    debug!(path = %path.display(), loaded = claims.len(), "Loaded claims");
    Ok(claims)
}

/// Load every line with its ground-truth label.
pub fn load_labeled(path: &Path) -> Result<Vec<LabeledClaim>> {
    let mut records = Vec::new();
    for_each_line(path, 0..usize::MAX, |index, line| {
        records.push(parse_line(path, index, line)?);
        Ok(())
    })?;
    Ok(records)
}
