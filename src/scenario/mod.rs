//! The per-phrase verification scenario and the data-driven runner.
//!
//! One iteration is: load the landing page, submit the phrase, then evaluate
//! three independent assertions against the results page. Iterations share
//! nothing; a failing one is recorded and the rest proceed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use chromiumoxide::page::Page;

use crate::browser::BrowserWrapper;
use crate::dataset::Dataset;
use crate::pages::{ResultPage, SearchPage, count_titles_containing};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a verification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Provider display name used in the expected title template
    /// `"{phrase} at {provider}"` (default: "DuckDuckGo")
    pub provider_name: String,

    /// Minimum number of result titles that must contain the phrase for the
    /// relevance assertion to hold (default: 1, floor: 1)
    pub match_threshold: usize,

    /// Run the browser in headless mode (default: true)
    pub headless: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            provider_name: "DuckDuckGo".to_string(),
            match_threshold: 1,
            headless: true,
        }
    }
}

impl VerifyConfig {
    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        use anyhow::Context;
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config.with_threshold_floor())
    }

    /// Enforce the match threshold floor of 1.
    ///
    /// A threshold of 0 would make the relevance assertion vacuously true,
    /// so every path that sets the threshold goes through this.
    #[must_use]
    pub fn with_threshold_floor(mut self) -> Self {
        self.match_threshold = self.match_threshold.max(1);
        self
    }

    /// Expected document title for a given phrase.
    #[must_use]
    pub fn expected_title(&self, phrase: &str) -> String {
        format!("{phrase} at {}", self.provider_name)
    }
}

// =============================================================================
// Checks and errors
// =============================================================================

/// The three assertions every iteration evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The results-page search input echoes the phrase exactly
    InputEcho,
    /// Enough result titles contain the phrase
    ResultRelevance,
    /// The document title matches the `"{phrase} at {provider}"` template
    TitleTemplate,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Check::InputEcho => "input echo",
            Check::ResultRelevance => "result relevance",
            Check::TitleTemplate => "title template",
        };
        f.write_str(name)
    }
}

/// One failed assertion with enough context to diagnose it on its own
#[derive(Debug, Clone)]
pub struct CheckFailure {
    pub check: Check,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {:?}, got {:?}",
            self.check, self.expected, self.actual
        )
    }
}

fn join_failures(failures: &[CheckFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error types for one verification iteration
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A collaborator-level failure: navigation, element timeout, or a CDP
    /// command error. Fatal to the current iteration only; never retried.
    #[error(transparent)]
    Page(#[from] anyhow::Error),

    /// One or more of the three assertions did not hold
    #[error("verification failed for {phrase:?}: {}", join_failures(.failures))]
    Verification {
        phrase: String,
        failures: Vec<CheckFailure>,
    },
}

// =============================================================================
// Per-phrase scenario
// =============================================================================

/// Run the verification scenario for a single phrase on an already-open page.
///
/// Load, search, then evaluate the three assertions. All three are evaluated
/// even when an earlier one fails, so every failure carries its own
/// diagnostic: an input-echo bug, a relevance bug, and a title-template bug
/// each show up separately.
pub async fn verify_search(
    page: &Page,
    phrase: &str,
    config: &VerifyConfig,
) -> Result<(), ScenarioError> {
    let search_page = SearchPage::new(page.clone());
    search_page.load().await?;
    search_page.search(phrase).await?;

    let result_page = ResultPage::new(page.clone());
    let mut failures = Vec::new();

    let echoed = result_page.search_input_value().await?;
    if echoed != phrase {
        failures.push(CheckFailure {
            check: Check::InputEcho,
            expected: phrase.to_string(),
            actual: echoed,
        });
    }

    let titles = result_page.result_link_titles().await?;
    let matched = count_titles_containing(&titles, phrase);
    if matched < config.match_threshold {
        failures.push(CheckFailure {
            check: Check::ResultRelevance,
            expected: format!(
                "at least {} of {} titles containing {phrase:?}",
                config.match_threshold,
                titles.len()
            ),
            actual: format!("{matched} matching titles"),
        });
    }

    let expected_title = config.expected_title(phrase);
    let title = result_page.page_title().await?;
    if title != expected_title {
        failures.push(CheckFailure {
            check: Check::TitleTemplate,
            expected: expected_title,
            actual: title,
        });
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ScenarioError::Verification {
            phrase: phrase.to_string(),
            failures,
        })
    }
}

// =============================================================================
// Data-driven runner
// =============================================================================

/// Outcome of one dataset iteration
#[derive(Debug)]
pub struct IterationOutcome {
    pub phrase: String,
    pub result: Result<(), ScenarioError>,
}

/// Outcomes of a whole run, one entry per phrase in dataset order
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<IterationOutcome>,
}

impl RunReport {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Run the scenario once per phrase, each on a fresh page.
///
/// Iterations are independent: a failing one is recorded in the report and
/// does not affect the rest. The page guard closes each page on every exit
/// path, so no state leaks between phrases.
pub async fn run_dataset(
    browser: &BrowserWrapper,
    dataset: &Dataset,
    config: &VerifyConfig,
) -> RunReport {
    let mut outcomes = Vec::with_capacity(dataset.len());

    for phrase in dataset {
        info!(phrase = %phrase, "starting verification iteration");
        let result = run_iteration(browser, phrase, config).await;
        match &result {
            Ok(()) => info!(phrase = %phrase, "iteration passed"),
            Err(e) => warn!(phrase = %phrase, error = %e, "iteration failed"),
        }
        outcomes.push(IterationOutcome {
            phrase: phrase.clone(),
            result,
        });
    }

    RunReport { outcomes }
}

async fn run_iteration(
    browser: &BrowserWrapper,
    phrase: &str,
    config: &VerifyConfig,
) -> Result<(), ScenarioError> {
    let page = browser.new_blank_page().await?;
    verify_search(&page, phrase, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_duckduckgo() {
        let config = VerifyConfig::default();
        assert_eq!(config.provider_name, "DuckDuckGo");
        assert_eq!(config.match_threshold, 1);
        assert!(config.headless);
    }

    #[test]
    fn expected_title_follows_template() {
        let config = VerifyConfig::default();
        assert_eq!(config.expected_title("otter"), "otter at DuckDuckGo");
    }

    #[test]
    fn check_failure_display_names_the_check() {
        let failure = CheckFailure {
            check: Check::InputEcho,
            expected: "otter".to_string(),
            actual: "otters".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "input echo: expected \"otter\", got \"otters\""
        );
    }

    #[test]
    fn verification_error_reports_every_failure() {
        let err = ScenarioError::Verification {
            phrase: "otter".to_string(),
            failures: vec![
                CheckFailure {
                    check: Check::ResultRelevance,
                    expected: "at least 1 of 5 titles containing \"otter\"".to_string(),
                    actual: "0 matching titles".to_string(),
                },
                CheckFailure {
                    check: Check::TitleTemplate,
                    expected: "otter at DuckDuckGo".to_string(),
                    actual: "DuckDuckGo".to_string(),
                },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("result relevance"));
        assert!(message.contains("title template"));
        assert!(message.contains("\"otter\""));
    }

    #[test]
    fn zero_threshold_in_config_is_raised_to_floor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"provider_name":"DuckDuckGo","match_threshold":0,"headless":true}"#,
        )
        .unwrap();

        // A threshold of 0 would let a results page with zero matching
        // titles pass the relevance assertion.
        let config = VerifyConfig::from_json_file(&path).unwrap();
        assert_eq!(config.match_threshold, 1);

        let titles = vec!["Dogs rule".to_string()];
        assert!(count_titles_containing(&titles, "otter") < config.match_threshold);
    }

    #[test]
    fn threshold_floor_keeps_higher_values() {
        let config = VerifyConfig {
            match_threshold: 3,
            ..VerifyConfig::default()
        }
        .with_threshold_floor();
        assert_eq!(config.match_threshold, 3);
    }

    #[test]
    fn config_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"provider_name":"DuckDuckGo","match_threshold":2,"headless":false}"#,
        )
        .unwrap();

        let config = VerifyConfig::from_json_file(&path).unwrap();
        assert_eq!(config.match_threshold, 2);
        assert!(!config.headless);
    }
}
