//! Data-driven verification harness for search engine result pages.
//!
//! Drives a real Chrome/Chromium instance through Page Objects
//! ([`SearchPage`], [`ResultPage`]) and runs the same search-and-verify
//! scenario over every phrase in an externally supplied [`Dataset`]. Each
//! iteration asserts that the results page echoes the query, that enough
//! result titles contain the phrase, and that the document title matches the
//! provider's title template.

pub mod browser;
pub mod dataset;
pub mod pages;
pub mod scenario;

pub use browser::{BrowserWrapper, PageGuard, launch_browser};
pub use dataset::{Dataset, DatasetError};
pub use pages::{ResultPage, SearchPage, count_titles_containing};
pub use scenario::{
    Check, CheckFailure, IterationOutcome, RunReport, ScenarioError, VerifyConfig, run_dataset,
    verify_search,
};
