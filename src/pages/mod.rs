//! Page Objects for the DuckDuckGo search surface.
//!
//! Each page object wraps the live page handle for the duration of one
//! verification iteration and exposes intention-revealing operations instead
//! of raw element queries. The readiness wait in [`wait_for_selector`] is the
//! single synchronization primitive between page transitions and queries.

pub mod result;
pub mod search;

pub use result::{ResultPage, count_titles_containing};
pub use search::SearchPage;

use anyhow::{Result, anyhow};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::time::{Duration, Instant};
use tracing::debug;

// =============================================================================
// Constants
// =============================================================================

/// DuckDuckGo landing page URL
pub const SEARCH_URL: &str = "https://www.duckduckgo.com";

/// CSS selector for the homepage search input
pub const SEARCH_INPUT_SELECTOR: &str = "#search_form_input_homepage";

/// CSS selector for the homepage search button
pub const SEARCH_BUTTON_SELECTOR: &str = "#search_button_homepage";

/// CSS selector for the results container, attached once the results view
/// has rendered
pub const RESULTS_CONTAINER_SELECTOR: &str = "#search";

/// CSS selector for result title links
pub const RESULT_TITLE_SELECTOR: &str = "a[data-testid='result-title-a']";

/// CSS selector for the results-page search input (echoes the query)
pub const RESULT_SEARCH_INPUT_SELECTOR: &str = "#search_form_input";

/// Maximum time to wait for a selector to attach (seconds)
pub const SELECTOR_WAIT_TIMEOUT: u64 = 10;

// =============================================================================
// Readiness wait
// =============================================================================

/// Wait until `selector` is attached to the DOM and return its element.
///
/// Polls `find_element` every 100 ms. Navigation completing only means the
/// HTTP response arrived; DuckDuckGo renders results via JavaScript
/// afterwards, so the DOM must be checked for the element itself.
///
/// On timeout the error carries the failing selector and the current page
/// URL.
pub(crate) async fn wait_for_selector(page: &Page, selector: &str) -> Result<Element> {
    let timeout = Duration::from_secs(SELECTOR_WAIT_TIMEOUT);
    let poll_interval = Duration::from_millis(100);
    let start = Instant::now();

    loop {
        match page.find_element(selector).await {
            Ok(element) => {
                debug!(selector, elapsed = ?start.elapsed(), "selector attached");
                return Ok(element);
            }
            Err(_) if start.elapsed() >= timeout => {
                let url = page
                    .url()
                    .await
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| "about:blank".to_string());
                return Err(anyhow!(
                    "timeout waiting for selector '{selector}' after {timeout:?} (page URL: {url})"
                ));
            }
            Err(_) => {
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}
