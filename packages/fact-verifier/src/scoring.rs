//! Offline accuracy scoring of parsed verdicts against corpus labels.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::stores::atomic::write_json_atomic;
use crate::types::{LabeledClaim, ParsedVerdict};

/// Corpus labels counted as true. Everything else is false.
pub const TRUE_LABELS: &[&str] = &["true", "mostly-true", "half-true"];

pub fn label_is_true(label: &str) -> bool {
    let label = label.trim().to_lowercase();
    TRUE_LABELS.contains(&label.as_str())
}

/// One claim judged by both the corpus and the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub statement: String,
    pub actual_verdict: bool,
    pub model_verdict: bool,
}

/// Actual × predicted counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    fn record(&mut self, actual: bool, predicted: bool) {
        match (actual, predicted) {
            (false, false) => self.true_negative += 1,
            (false, true) => self.false_positive += 1,
            (true, false) => self.false_negative += 1,
            (true, true) => self.true_positive += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(hit: usize, predicted: usize, actual: usize) -> Self {
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(hit, predicted);
        let recall = ratio(hit, actual);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            precision,
            recall,
            f1,
            support: actual,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreReport {
    pub comparisons: Vec<Comparison>,
    /// Claims with a verdict but no labeled corpus entry
    pub unmatched: Vec<String>,
    /// Records skipped because their verdict was null
    pub skipped: usize,
    pub matrix: ConfusionMatrix,
}

impl ScoreReport {
    pub fn total(&self) -> usize {
        self.comparisons.len()
    }

    pub fn accuracy(&self) -> f64 {
        if self.comparisons.is_empty() {
            return 0.0;
        }
        let correct = self.matrix.true_negative + self.matrix.true_positive;
        correct as f64 / self.total() as f64
    }

    pub fn false_class(&self) -> ClassMetrics {
        let m = &self.matrix;
        ClassMetrics::from_counts(
            m.true_negative,
            m.true_negative + m.false_negative,
            m.true_negative + m.false_positive,
        )
    }

    pub fn true_class(&self) -> ClassMetrics {
        let m = &self.matrix;
        ClassMetrics::from_counts(
            m.true_positive,
            m.true_positive + m.false_positive,
            m.true_positive + m.false_negative,
        )
    }

    /// Write the per-claim comparison list as pretty JSON.
    pub fn write_comparisons(&self, path: &Path) -> StoreResult<()> {
        write_json_atomic(path, &self.comparisons)
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.4}", self.accuracy())?;
        writeln!(f, "Total comparisons: {}", self.total())?;
        writeln!(f, "Unmatched: {}", self.unmatched.len())?;
        writeln!(f, "Skipped (no verdict): {}", self.skipped)?;
        writeln!(f)?;
        writeln!(f, "Confusion matrix (rows actual, columns predicted)")?;
        writeln!(f, "{:>8} {:>8} {:>8}", "", "False", "True")?;
        writeln!(
            f,
            "{:>8} {:>8} {:>8}",
            "False", self.matrix.true_negative, self.matrix.false_positive
        )?;
        writeln!(
            f,
            "{:>8} {:>8} {:>8}",
            "True", self.matrix.false_negative, self.matrix.true_positive
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>8} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for (name, metrics) in [("False", self.false_class()), ("True", self.true_class())] {
            writeln!(
                f,
                "{:>8} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, metrics.precision, metrics.recall, metrics.f1, metrics.support
            )?;
        }
        Ok(())
    }
}

/// Compare parsed verdicts with corpus labels by exact claim text.
///
/// Corpus entries without a label cannot be matched. When a statement
/// appears more than once in the corpus, the last label wins.
pub fn score(parsed: &[ParsedVerdict], labeled: &[LabeledClaim]) -> ScoreReport {
    let truth: HashMap<&str, bool> = labeled
        .iter()
        .filter_map(|entry| {
            entry
                .verdict
                .as_deref()
                .map(|label| (entry.statement.as_str(), label_is_true(label)))
        })
        .collect();

    let mut report = ScoreReport::default();
    for record in parsed {
        let Some(verdict) = record.verdict else {
            report.skipped += 1;
            continue;
        };

        match truth.get(record.claim.as_str()) {
            Some(&actual) => {
                let predicted = verdict.as_bool();
                report.matrix.record(actual, predicted);
                report.comparisons.push(Comparison {
                    statement: record.claim.clone(),
                    actual_verdict: actual,
                    model_verdict: predicted,
                });
            }
            None => report.unmatched.push(record.claim.clone()),
        }
    }
    report
}
