//! Integration tests for the resumable batch pipeline.
//!
//! These run the driver end to end against mock providers and a temporary
//! output directory:
//! 1. Collect evidence (with timeouts and length filtering)
//! 2. Synthesize and parse verdicts
//! 3. Persist results and checkpoint
//! 4. Resume without repeating finished work

use std::sync::Arc;
use std::time::Duration;

use fact_verifier::{
    testing::{filler_text, ExtractOutcome, MockExtractor, MockSearcher, MockSynthesizer},
    BatchDriver, ClaimItem, ItemState, OutputLayout, PersistMode, SearchHit, Verdict,
    VerifierConfig, VerifierError,
};
use tokio_util::sync::CancellationToken;

const SKY: &str = "The sky is green.";

/// Helper to build a driver over mocks in `dir`.
fn driver(
    dir: &std::path::Path,
    searcher: &MockSearcher,
    extractor: &MockExtractor,
    synthesizer: &MockSynthesizer,
    config: VerifierConfig,
) -> BatchDriver {
    BatchDriver::from_providers(
        Arc::new(searcher.clone()),
        Arc::new(extractor.clone()),
        Arc::new(synthesizer.clone()),
        config,
        &OutputLayout::new(dir),
    )
}

fn fast_config() -> VerifierConfig {
    VerifierConfig::default().with_fetch_pacing(Duration::ZERO)
}

fn hit(n: usize) -> SearchHit {
    SearchHit::new(
        format!("Article {}", n),
        format!("https://news.example/{}", n),
        format!("snippet {}", n),
    )
}

/// Searcher and extractor where every claim in `claims` gets one good document.
fn simple_providers(claims: &[&str]) -> (MockSearcher, MockExtractor) {
    let mut searcher = MockSearcher::new();
    for claim in claims {
        searcher = searcher.with_results(*claim, vec![hit(0)]);
    }
    let extractor = MockExtractor::new().with_summary("https://news.example/0", filler_text(400));
    (searcher, extractor)
}

fn read_json(path: std::path::PathBuf) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_sky_is_green_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let searcher = MockSearcher::new().with_results(SKY, vec![hit(0), hit(1), hit(2)]);
    let extractor = MockExtractor::new()
        .with_summary("https://news.example/0", filler_text(250))
        .with_outcome(
            "https://news.example/1",
            ExtractOutcome::Hang(Duration::from_secs(3600)),
        )
        .with_summary("https://news.example/2", filler_text(300));
    let synthesizer = MockSynthesizer::new(
        "**Verdict:** False\n\
         **Collective Summary:** Every source says the sky is blue.\n\
         **Reasoning:** Rayleigh scattering.\n\
         **Sources Summary:**\n\
         - Article 0: scattering basics\n\
         - Article 2: sky colour FAQ",
    );

    let driver = driver(dir.path(), &searcher, &extractor, &synthesizer, fast_config());
    let summary = driver
        .run(&[ClaimItem::new(0, SKY)], 0..1, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 0);

    let bundles = driver.stores().evidence.load().unwrap();
    assert_eq!(bundles.len(), 1);
    let urls: Vec<&str> = bundles[0].documents.iter().map(|d| d.url.as_str()).collect();
    assert_eq!(urls, vec!["https://news.example/0", "https://news.example/2"]);

    let parsed = driver.stores().parsed.load().unwrap();
    assert_eq!(parsed[0].claim, SKY);
    assert_eq!(parsed[0].verdict, Some(Verdict::False));
    assert_eq!(parsed[0].sources_summary.len(), 2);

    let raw = driver.stores().raw.load().unwrap();
    assert!(raw[0].raw_text.contains("**Verdict:** False"));

    assert_eq!(read_json(dir.path().join("checkpoint.json")), serde_json::json!([0]));
    assert_eq!(read_json(dir.path().join("parsed_output.json"))[0]["verdict"], "False");
}

#[tokio::test]
async fn test_missing_reasoning_is_null_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let (searcher, extractor) = simple_providers(&[SKY]);
    let synthesizer = MockSynthesizer::new("**Verdict:** False\n**Collective Summary:** blue");

    let driver = driver(dir.path(), &searcher, &extractor, &synthesizer, fast_config());
    let summary = driver
        .run(&[ClaimItem::new(0, SKY)], 0..1, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.completed, 1);
    let stored = read_json(dir.path().join("parsed_output.json"));
    assert!(stored[0]["reasoning"].is_null());
    assert_eq!(stored[0]["sources_summary"], serde_json::json!([]));
}

#[tokio::test]
async fn test_zero_evidence_fails_item_without_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("checkpoint.json"), "[7]").unwrap();
    std::fs::write(dir.path().join("error_log.txt"), "[3] earlier... → boom\n").unwrap();

    let searcher = MockSearcher::new().with_results(SKY, vec![hit(0), hit(1)]);
    let extractor = MockExtractor::new()
        .with_summary("https://news.example/0", filler_text(199))
        .with_outcome("https://news.example/1", ExtractOutcome::Fail);
    let synthesizer = MockSynthesizer::default();

    let driver = driver(dir.path(), &searcher, &extractor, &synthesizer, fast_config());
    let summary = driver
        .run(&[ClaimItem::new(0, SKY)], 0..1, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.states.get(&0), Some(&ItemState::Failed));
    assert_eq!(synthesizer.call_count(), 0);
    assert_eq!(read_json(dir.path().join("checkpoint.json")), serde_json::json!([7]));

    let log = std::fs::read_to_string(dir.path().join("error_log.txt")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "[0] The sky is green.... → No valid articles found.");

    assert!(driver.stores().evidence.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkpointed_items_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("checkpoint.json"), "[0, 1]").unwrap();

    let (searcher, extractor) = simple_providers(&["zero", "one", "two"]);
    let synthesizer = MockSynthesizer::default();
    let claims = vec![
        ClaimItem::new(0, "zero"),
        ClaimItem::new(1, "one"),
        ClaimItem::new(2, "two"),
    ];

    let driver = driver(dir.path(), &searcher, &extractor, &synthesizer, fast_config());
    let summary = driver
        .run(&claims, 0..3, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.previously_done, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.completed, 1);
    assert_eq!(searcher.calls(), vec!["two"]);
    assert_eq!(extractor.call_count(), 1);

    // A second run over the same range does no provider work at all
    let again = driver
        .run(&claims, 0..3, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(again.skipped, 3);
    assert_eq!(again.completed, 0);
    assert_eq!(searcher.call_count(), 1);
}

#[tokio::test]
async fn test_existing_results_win_over_new_run() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("parsed_output.json"),
        format!(
            r#"[{{"fact": "{}", "verdict": "True", "collective_summary": null, "reasoning": null, "sources_summary": []}}]"#,
            SKY
        ),
    )
    .unwrap();

    let (searcher, extractor) = simple_providers(&[SKY, "other"]);
    let synthesizer = MockSynthesizer::new("**Verdict:** False");
    let claims = vec![ClaimItem::new(0, SKY), ClaimItem::new(1, "other")];

    let driver = driver(dir.path(), &searcher, &extractor, &synthesizer, fast_config());
    driver
        .run(&claims, 0..2, &CancellationToken::new())
        .await
        .unwrap();

    let parsed = driver.stores().parsed.load().unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].claim, SKY);
    assert_eq!(parsed[0].verdict, Some(Verdict::True));
    assert_eq!(parsed[1].claim, "other");
    assert_eq!(parsed[1].verdict, Some(Verdict::False));
}

#[tokio::test]
async fn test_failed_item_is_retried_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let (searcher, extractor) = simple_providers(&[SKY]);
    let claims = vec![ClaimItem::new(0, SKY)];

    let failing = MockSynthesizer::failing("503 Service Unavailable");
    let first = driver(dir.path(), &searcher, &extractor, &failing, fast_config())
        .run(&claims, 0..1, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(first.failed, 1);

    let working = MockSynthesizer::new("**Verdict:** False");
    let second = driver(dir.path(), &searcher, &extractor, &working, fast_config())
        .run(&claims, 0..1, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(second.completed, 1);
    assert_eq!(second.previously_done, 0);
    assert_eq!(read_json(dir.path().join("checkpoint.json")), serde_json::json!([0]));
}

#[tokio::test]
async fn test_end_of_run_mode_keeps_checkpoint_per_item() {
    let dir = tempfile::tempdir().unwrap();
    let (searcher, extractor) = simple_providers(&["a", "b"]);
    let synthesizer = MockSynthesizer::default();
    let claims = vec![ClaimItem::new(0, "a"), ClaimItem::new(1, "b")];

    let driver = driver(
        dir.path(),
        &searcher,
        &extractor,
        &synthesizer,
        fast_config().with_persist_mode(PersistMode::EndOfRun),
    );
    let summary = driver
        .run(&claims, 0..2, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.completed, 2);
    assert_eq!(driver.stores().evidence.load().unwrap().len(), 2);
    assert_eq!(driver.stores().raw.load().unwrap().len(), 2);
    assert_eq!(read_json(dir.path().join("checkpoint.json")), serde_json::json!([0, 1]));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_abandons_in_flight_item() {
    let dir = tempfile::tempdir().unwrap();
    let (searcher, extractor) = simple_providers(&["fast", "slow"]);
    let synthesizer = MockSynthesizer::default().with_delay(Duration::from_secs(600));
    let claims = vec![ClaimItem::new(0, "fast"), ClaimItem::new(1, "slow")];

    // Cancel partway through the first item's synthesis
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(30)).await;
        trigger.cancel();
    });

    let driver = driver(dir.path(), &searcher, &extractor, &synthesizer, fast_config());
    let summary = driver.run(&claims, 0..2, &cancel).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.completed, 0);
    assert_eq!(summary.states.get(&0), Some(&ItemState::Pending));
    assert!(!summary.states.contains_key(&1));
    assert!(driver.checkpoint().load().unwrap().is_empty());
    assert!(!dir.path().join("error_log.txt").exists());
}

#[tokio::test]
async fn test_unreadable_store_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the output directory should be
    let not_a_dir = dir.path().join("output");
    std::fs::write(&not_a_dir, "").unwrap();

    let (searcher, extractor) = simple_providers(&[SKY]);
    let synthesizer = MockSynthesizer::default();

    let driver = driver(&not_a_dir, &searcher, &extractor, &synthesizer, fast_config());
    let err = driver
        .run(&[ClaimItem::new(0, SKY)], 0..1, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, VerifierError::Store(_)));
    assert_eq!(searcher.call_count(), 0);
}
