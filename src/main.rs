//! Command-line runner: verify a dataset of search phrases end to end.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use searchcheck::{BrowserWrapper, Dataset, VerifyConfig, run_dataset};

#[derive(Debug, Parser)]
#[command(
    name = "searchcheck",
    version,
    about = "Run a search verification scenario over a dataset of phrases"
)]
struct Cli {
    /// Dataset file: a .json list of strings, or line-delimited text
    #[arg(long)]
    dataset: PathBuf,

    /// Optional JSON config file overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum number of result titles that must contain the phrase
    #[arg(long)]
    min_matches: Option<usize>,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => VerifyConfig::from_json_file(path)?,
        None => VerifyConfig::default(),
    };
    if let Some(min) = cli.min_matches {
        config.match_threshold = min;
        config = config.with_threshold_floor();
    }
    if cli.headed {
        config.headless = false;
    }

    let dataset = Dataset::load(&cli.dataset).context("failed to load the phrase dataset")?;
    if dataset.is_empty() {
        println!("dataset is empty, nothing to verify");
        return Ok(ExitCode::SUCCESS);
    }

    info!(phrases = dataset.len(), "starting verification run");
    let browser = BrowserWrapper::launch(config.headless).await?;

    let report = run_dataset(&browser, &dataset, &config).await;

    browser.shutdown().await?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!("PASS {}", outcome.phrase),
            Err(e) => println!("FAIL {}: {e}", outcome.phrase),
        }
    }
    println!(
        "{} passed, {} failed, {} total",
        report.passed(),
        report.failed(),
        report.outcomes.len()
    );

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
