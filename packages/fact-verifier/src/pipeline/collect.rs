//! Evidence collection for one claim.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::VerifierConfig;
use crate::error::{DocumentError, ItemError, ItemResult, SearchError};
use crate::traits::{DocumentExtractor, WebSearcher};
use crate::types::{EvidenceBundle, EvidenceDocument, SearchHit};

/// Turns a claim into a ranked, filtered evidence bundle.
///
/// Each extraction runs in its own task under a hard timeout. A timed-out
/// task is aborted, and a panicking one only loses its own document.
pub struct EvidenceCollector {
    searcher: Arc<dyn WebSearcher>,
    extractor: Arc<dyn DocumentExtractor>,
    config: VerifierConfig,
}

impl EvidenceCollector {
    pub fn new(
        searcher: Arc<dyn WebSearcher>,
        extractor: Arc<dyn DocumentExtractor>,
        config: VerifierConfig,
    ) -> Self {
        Self {
            searcher,
            extractor,
            config,
        }
    }

    /// Collect up to `top_k` qualifying documents, in search rank order.
    ///
    /// Fails with [`ItemError::NoEvidence`] when nothing qualifies.
    pub async fn collect(&self, claim: &str) -> ItemResult<EvidenceBundle> {
        let hits = self.search(claim).await?;
        debug!(candidates = hits.len(), "Search returned candidates");

        let mut documents = Vec::with_capacity(self.config.top_k);
        for (position, hit) in hits.into_iter().enumerate() {
            // Rank order is preserved, so the first top_k keepers are the answer
            if documents.len() >= self.config.top_k {
                break;
            }
            if position > 0 && !self.config.fetch_pacing.is_zero() {
                tokio::time::sleep(self.config.fetch_pacing).await;
            }

            match self.extract_isolated(&hit.url).await {
                Ok(summary) => {
                    if let Some(doc) = self.qualify(hit, summary) {
                        documents.push(doc);
                    }
                }
                Err(e) => {
                    debug!(extractor = self.extractor.name(), error = %e, "Dropped evidence document");
                }
            }
        }

        if documents.is_empty() {
            warn!("No qualifying evidence documents");
            return Err(ItemError::NoEvidence);
        }

        info!(kept = documents.len(), "Evidence collected");
        Ok(EvidenceBundle {
            claim: claim.to_string(),
            documents,
        })
    }

    async fn search(&self, claim: &str) -> Result<Vec<SearchHit>, SearchError> {
        let search = self.searcher.search(claim, self.config.search_results);
        match self.config.search_timeout {
            Some(limit) => tokio::time::timeout(limit, search)
                .await
                .map_err(|_| SearchError::Timeout(limit))?,
            None => search.await,
        }
    }

    /// Run one extraction in a spawned task bounded by the extraction timeout.
    async fn extract_isolated(&self, url: &str) -> Result<String, DocumentError> {
        let budget: Duration = self.config.extraction_timeout;
        let extractor = Arc::clone(&self.extractor);
        let owned_url = url.to_string();

        let mut handle = tokio::spawn(async move { extractor.extract(&owned_url).await });

        match tokio::time::timeout(budget, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(DocumentError::Worker {
                url: url.to_string(),
                reason: join_error.to_string(),
            }),
            Err(_) => {
                handle.abort();
                Err(DocumentError::Timeout {
                    url: url.to_string(),
                    after: budget,
                })
            }
        }
    }

    fn qualify(&self, hit: SearchHit, summary: String) -> Option<EvidenceDocument> {
        let trimmed = summary.trim();
        let length = trimmed.chars().count();
        if length < self.config.min_summary_chars {
            debug!(url = %hit.url, length, "Summary below minimum length");
            return None;
        }
        let summary = trimmed.to_string();
        Some(EvidenceDocument::from_hit(hit, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{filler_text, ExtractOutcome, MockExtractor, MockSearcher};

    fn hits(n: usize) -> Vec<SearchHit> {
        (0..n)
            .map(|i| SearchHit::new(format!("Doc {}", i), format!("https://example.com/{}", i), "s"))
            .collect()
    }

    fn collector(searcher: MockSearcher, extractor: MockExtractor, config: VerifierConfig) -> EvidenceCollector {
        EvidenceCollector::new(Arc::new(searcher), Arc::new(extractor), config)
    }

    fn fast_config() -> VerifierConfig {
        VerifierConfig::default().with_fetch_pacing(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_length_filter_boundary() {
        let searcher = MockSearcher::new().with_results("claim", hits(2));
        let extractor = MockExtractor::new()
            .with_summary("https://example.com/0", filler_text(199))
            .with_summary("https://example.com/1", format!("  {}\n", filler_text(200)));

        let bundle = collector(searcher, extractor, fast_config())
            .collect("claim")
            .await
            .unwrap();

        assert_eq!(bundle.documents.len(), 1);
        assert_eq!(bundle.documents[0].url, "https://example.com/1");
        assert_eq!(bundle.documents[0].summary.chars().count(), 200);
    }

    #[tokio::test]
    async fn test_top_k_truncation_keeps_rank_order() {
        let searcher = MockSearcher::new().with_results("claim", hits(9));
        let mut extractor = MockExtractor::new();
        for i in 0..9 {
            extractor = extractor.with_summary(format!("https://example.com/{}", i), filler_text(300));
        }

        let bundle = collector(searcher, extractor.clone(), fast_config())
            .collect("claim")
            .await
            .unwrap();

        let urls: Vec<&str> = bundle.documents.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(
            urls,
            (0..6).map(|i| format!("https://example.com/{}", i)).collect::<Vec<_>>()
        );
        assert_eq!(extractor.call_count(), 6);
    }

    #[tokio::test]
    async fn test_failures_are_dropped() {
        let searcher = MockSearcher::new().with_results("claim", hits(3));
        let extractor = MockExtractor::new()
            .with_outcome("https://example.com/0", ExtractOutcome::Fail)
            .with_outcome("https://example.com/1", ExtractOutcome::Panic)
            .with_summary("https://example.com/2", filler_text(250));

        let bundle = collector(searcher, extractor, fast_config())
            .collect("claim")
            .await
            .unwrap();

        assert_eq!(bundle.documents.len(), 1);
        assert_eq!(bundle.documents[0].title, "Doc 2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_does_not_block_later_documents() {
        let searcher = MockSearcher::new().with_results("claim", hits(2));
        let extractor = MockExtractor::new()
            .with_outcome("https://example.com/0", ExtractOutcome::Hang(Duration::from_secs(3600)))
            .with_summary("https://example.com/1", filler_text(300));

        let started = tokio::time::Instant::now();
        let bundle = collector(searcher, extractor.clone(), fast_config())
            .collect("claim")
            .await
            .unwrap();

        assert_eq!(bundle.documents.len(), 1);
        assert_eq!(bundle.documents[0].url, "https://example.com/1");
        assert!(started.elapsed() < Duration::from_secs(11));
        assert!(!extractor.finished().contains(&"https://example.com/0".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_between_fetches() {
        let searcher = MockSearcher::new().with_results("claim", hits(3));
        let extractor = MockExtractor::new();

        let started = tokio::time::Instant::now();
        let result = collector(searcher, extractor, VerifierConfig::default())
            .collect("claim")
            .await;

        assert!(matches!(result, Err(ItemError::NoEvidence)));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_no_hits_is_no_evidence() {
        let result = collector(MockSearcher::new(), MockExtractor::new(), fast_config())
            .collect("nothing")
            .await;
        assert!(matches!(result, Err(ItemError::NoEvidence)));
    }

    #[tokio::test]
    async fn test_search_failure_is_item_error() {
        let result = collector(MockSearcher::failing(), MockExtractor::new(), fast_config())
            .collect("claim")
            .await;
        assert!(matches!(result, Err(ItemError::Search(_))));
    }
}
