//! Fact verification CLI
//!
//! `run` verifies a range of claims from the corpus, resuming from the
//! checkpoint in the output directory. `score` compares parsed verdicts
//! against the corpus labels.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fact_verifier::{
    corpus, scoring, BatchDriver, ChatSynthesizer, Credentials, GoogleSearcher, HttpExtractor,
    OutputLayout, ParsedVerdict, PersistMode, ResultStore, VerifierConfig,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_INPUT: &str = "data/politifact_factcheck_data.json";
const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Parser)]
#[command(name = "fact-verifier")]
#[command(about = "Resumable batch fact verification over web evidence")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify claims in [start, end) and persist results
    Run(RunArgs),

    /// Score parsed verdicts against corpus labels
    Score(ScoreArgs),
}

#[derive(Args)]
struct RunArgs {
    /// First claim index (inclusive)
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Last claim index (exclusive)
    #[arg(long, default_value_t = 10)]
    end: usize,

    /// Line-delimited JSON corpus
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Maximum evidence documents per claim
    #[arg(long, default_value_t = 6)]
    top_k: usize,

    /// Search results requested per claim (1-10)
    #[arg(long, default_value_t = 10)]
    search_results: usize,

    #[arg(long, default_value_t = 200)]
    min_summary_chars: usize,

    #[arg(long, default_value_t = 10)]
    extraction_timeout_secs: u64,

    /// Delay between document fetches
    #[arg(long, default_value_t = 1000)]
    pacing_ms: u64,

    #[arg(long, value_enum, default_value_t = PersistArg::PerItem)]
    persist: PersistArg,

    #[arg(long, default_value = "gemini-2.0-flash")]
    model: String,

    /// Bound on each synthesis call (unbounded when omitted)
    #[arg(long)]
    synthesis_timeout_secs: Option<u64>,

    /// Bound on each search call (unbounded when omitted)
    #[arg(long)]
    search_timeout_secs: Option<u64>,
}

#[derive(Args)]
struct ScoreArgs {
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum PersistArg {
    /// Merge results after every completed claim
    PerItem,
    /// Merge results once when the run ends
    EndOfRun,
}

impl From<PersistArg> for PersistMode {
    fn from(arg: PersistArg) -> Self {
        match arg {
            PersistArg::PerItem => PersistMode::PerItem,
            PersistArg::EndOfRun => PersistMode::EndOfRun,
        }
    }
}

impl RunArgs {
    fn config(&self) -> VerifierConfig {
        VerifierConfig::default()
            .with_top_k(self.top_k)
            .with_search_results(self.search_results)
            .with_min_summary_chars(self.min_summary_chars)
            .with_extraction_timeout(Duration::from_secs(self.extraction_timeout_secs))
            .with_fetch_pacing(Duration::from_millis(self.pacing_ms))
            .with_persist_mode(self.persist.into())
            .with_model(&self.model)
            .with_synthesis_timeout(self.synthesis_timeout_secs.map(Duration::from_secs))
            .with_search_timeout(self.search_timeout_secs.map(Duration::from_secs))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fact_verifier=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Score(args) => score(args),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    if args.end < args.start {
        bail!("--end ({}) must not be less than --start ({})", args.end, args.start);
    }

    let config = args.config();
    config.validate()?;
    let credentials = Credentials::from_env().context("Failed to load credentials")?;
    let claims = corpus::load_claims(&args.input, args.start..args.end)
        .with_context(|| format!("Failed to load claims from {}", args.input.display()))?;

    let searcher = GoogleSearcher::new(
        credentials.search_api_key.clone(),
        credentials.search_engine_id.clone(),
    );
    let synthesizer = ChatSynthesizer::from_credentials(&credentials, &config.model);
    let layout = OutputLayout::new(&args.output_dir);
    let driver = BatchDriver::from_providers(
        Arc::new(searcher),
        Arc::new(HttpExtractor::new()),
        Arc::new(synthesizer),
        config,
        &layout,
    );

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after flushing results");
            trigger.cancel();
        }
    });

    let summary = driver.run(&claims, args.start..args.end, &cancel).await?;
    println!("\n{}", summary);
    Ok(())
}

fn score(args: ScoreArgs) -> Result<()> {
    let layout = OutputLayout::new(&args.output_dir);
    let parsed = ResultStore::<ParsedVerdict>::in_layout(&layout)
        .load()
        .context("Failed to load parsed verdicts")?;
    let labeled = corpus::load_labeled(&args.input)
        .with_context(|| format!("Failed to load labels from {}", args.input.display()))?;

    let report = scoring::score(&parsed, &labeled);
    let comparison = layout.comparison();
    report
        .write_comparisons(&comparison)
        .context("Failed to write verdict comparison")?;

    println!("Saved comparison to: {}", comparison.display());
    println!("{}", report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["fact-verifier", "run"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.start, 0);
        assert_eq!(args.end, 10);
        assert_eq!(args.input, PathBuf::from(DEFAULT_INPUT));

        let config = args.config();
        assert_eq!(config.top_k, 6);
        assert_eq!(config.fetch_pacing, Duration::from_secs(1));
        assert_eq!(config.persist_mode, PersistMode::PerItem);
        assert!(config.synthesis_timeout.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "fact-verifier",
            "run",
            "--start",
            "5",
            "--end",
            "8",
            "--persist",
            "end-of-run",
            "--synthesis-timeout-secs",
            "60",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = args.config();
        assert_eq!((args.start, args.end), (5, 8));
        assert_eq!(config.persist_mode, PersistMode::EndOfRun);
        assert_eq!(config.synthesis_timeout, Some(Duration::from_secs(60)));
    }
}
