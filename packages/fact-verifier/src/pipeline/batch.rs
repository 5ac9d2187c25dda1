//! Resumable batch driver.
//!
//! Items run one at a time. Each item moves `Pending → InProgress → Done |
//! Failed`. `Done` is checkpointed and durable; `Failed` only lasts for this
//! run, so the item is retried next time. Items already in the checkpoint are
//! skipped without touching any provider.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{OutputLayout, PersistMode, VerifierConfig};
use crate::error::{ItemResult, Result, StoreResult};
use crate::pipeline::collect::EvidenceCollector;
use crate::pipeline::synthesize::{Synthesized, VerdictAdapter};
use crate::stores::{CheckpointSet, CheckpointStore, FailureLog, ResultStores};
use crate::traits::{DocumentExtractor, Synthesizer, WebSearcher};
use crate::types::{ClaimItem, EvidenceBundle, ParsedVerdict, VerdictText};

/// Lifecycle of one claim within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    Pending,
    InProgress,
    Done,
    Failed,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Records produced during one run and not yet merged into the stores.
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    evidence: Vec<EvidenceBundle>,
    raw: Vec<VerdictText>,
    parsed: Vec<ParsedVerdict>,
}

impl BatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bundle: EvidenceBundle, synthesized: Synthesized) {
        self.evidence.push(bundle);
        self.raw.push(synthesized.text);
        self.parsed.push(synthesized.parsed);
    }

    /// Number of completed items held.
    pub fn len(&self) -> usize {
        self.evidence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty()
    }

    /// Merge everything held into the stores. Cleared only on success.
    pub fn flush(&mut self, stores: &ResultStores) -> StoreResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        stores.evidence.merge_and_save(&self.evidence)?;
        stores.raw.merge_and_save(&self.raw)?;
        stores.parsed.merge_and_save(&self.parsed)?;

        debug!(records = self.len(), "Flushed batch results");
        self.evidence.clear();
        self.raw.clear();
        self.parsed.clear();
        Ok(())
    }
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub start: usize,
    pub end: usize,
    /// Checkpoint size when the run started
    pub previously_done: usize,
    /// Items in range skipped because they were already checkpointed
    pub skipped: usize,
    pub completed: usize,
    pub failed: usize,
    /// Run stopped early on cancellation
    pub cancelled: bool,
    /// Final state of every item the run looked at
    pub states: BTreeMap<usize, ItemState>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cancelled {
            writeln!(f, "Cancelled during range {}–{}", self.start, self.end)?;
        } else {
            writeln!(f, "Done! Processed range {}–{}", self.start, self.end)?;
        }
        write!(
            f,
            "Previously done: {} | Newly saved: {}",
            self.previously_done, self.completed
        )
    }
}

/// Drives claims through collection and synthesis with durable progress.
pub struct BatchDriver {
    collector: EvidenceCollector,
    adapter: VerdictAdapter,
    checkpoint: CheckpointStore,
    stores: ResultStores,
    failure_log: FailureLog,
    persist_mode: PersistMode,
}

impl BatchDriver {
    pub fn new(
        collector: EvidenceCollector,
        adapter: VerdictAdapter,
        layout: &OutputLayout,
        persist_mode: PersistMode,
    ) -> Self {
        Self {
            collector,
            adapter,
            checkpoint: CheckpointStore::new(layout.checkpoint()),
            stores: ResultStores::in_layout(layout),
            failure_log: FailureLog::new(layout.failure_log()),
            persist_mode,
        }
    }

    /// Wire a driver from providers and a validated config.
    pub fn from_providers(
        searcher: Arc<dyn WebSearcher>,
        extractor: Arc<dyn DocumentExtractor>,
        synthesizer: Arc<dyn Synthesizer>,
        config: VerifierConfig,
        layout: &OutputLayout,
    ) -> Self {
        let adapter = VerdictAdapter::new(synthesizer, &config);
        let persist_mode = config.persist_mode;
        let collector = EvidenceCollector::new(searcher, extractor, config);
        Self::new(collector, adapter, layout, persist_mode)
    }

    pub fn checkpoint(&self) -> &CheckpointStore {
        &self.checkpoint
    }

    pub fn stores(&self) -> &ResultStores {
        &self.stores
    }

    pub fn failure_log(&self) -> &FailureLog {
        &self.failure_log
    }

    /// Full pipeline for one claim.
    #[instrument(skip(self, item), fields(index = item.index))]
    pub async fn process_item(&self, item: &ClaimItem) -> ItemResult<(EvidenceBundle, Synthesized)> {
        let bundle = self.collector.collect(&item.text).await?;
        let synthesized = self.adapter.synthesize(&bundle).await?;
        Ok((bundle, synthesized))
    }

    /// Process the claims whose index lies in `range`.
    ///
    /// Item failures are logged and never abort the run. A durable store
    /// failure does, after a best-effort flush of pending results.
    pub async fn run(
        &self,
        claims: &[ClaimItem],
        range: Range<usize>,
        cancel: &CancellationToken,
    ) -> Result<RunSummary> {
        let mut done = self.checkpoint.load()?;
        let mut summary = RunSummary {
            start: range.start,
            end: range.end,
            previously_done: done.len(),
            ..RunSummary::default()
        };
        info!(
            start = range.start,
            end = range.end,
            previously_done = summary.previously_done,
            mode = ?self.persist_mode,
            "Starting batch"
        );

        let mut pending = BatchAccumulator::new();
        let outcome = self
            .run_items(claims, &range, cancel, &mut done, &mut pending, &mut summary)
            .await;

        let flushed = pending.flush(&self.stores);
        match (outcome, flushed) {
            (Err(e), flushed) => {
                if let Err(flush_error) = flushed {
                    error!(error = %flush_error, "Final flush failed after store error");
                }
                Err(e)
            }
            (Ok(()), Err(flush_error)) => Err(flush_error.into()),
            (Ok(()), Ok(())) => {
                info!(
                    completed = summary.completed,
                    failed = summary.failed,
                    skipped = summary.skipped,
                    cancelled = summary.cancelled,
                    "Batch finished"
                );
                Ok(summary)
            }
        }
    }

    async fn run_items(
        &self,
        claims: &[ClaimItem],
        range: &Range<usize>,
        cancel: &CancellationToken,
        done: &mut CheckpointSet,
        pending: &mut BatchAccumulator,
        summary: &mut RunSummary,
    ) -> Result<()> {
        for item in claims.iter().filter(|c| range.contains(&c.index)) {
            if done.contains(item.index) {
                summary.skipped += 1;
                debug!(index = item.index, "Already done, skipping");
                continue;
            }
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            summary.states.insert(item.index, ItemState::InProgress);
            let result = tokio::select! {
                result = self.process_item(item) => Some(result),
                _ = cancel.cancelled() => None,
            };

            let Some(result) = result else {
                // Abandoned mid-flight: not checkpointed, eligible next run
                summary.states.insert(item.index, ItemState::Pending);
                summary.cancelled = true;
                warn!(index = item.index, "Cancelled while processing item");
                break;
            };

            match result {
                Ok((bundle, synthesized)) => {
                    pending.push(bundle, synthesized);
                    done.insert(item.index);
                    if self.persist_mode == PersistMode::PerItem {
                        pending.flush(&self.stores)?;
                    }
                    self.checkpoint.save(done)?;

                    summary.completed += 1;
                    summary.states.insert(item.index, ItemState::Done);
                    info!(index = item.index, state = %ItemState::Done, "Item complete");
                }
                Err(e) => {
                    summary.failed += 1;
                    summary.states.insert(item.index, ItemState::Failed);
                    warn!(index = item.index, error = %e, state = %ItemState::Failed, "Item failed");
                    if let Err(log_error) = self.failure_log.append(item, &e) {
                        error!(error = %log_error, "Could not write failure log");
                    }
                }
            }
        }
        Ok(())
    }
}
