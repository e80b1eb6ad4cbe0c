//! `SearchPage`, the page object for the DuckDuckGo landing page.

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use tracing::info;

use super::{
    RESULTS_CONTAINER_SELECTOR, SEARCH_BUTTON_SELECTOR, SEARCH_INPUT_SELECTOR, SEARCH_URL,
    wait_for_selector,
};

/// Page object for the DuckDuckGo landing page.
///
/// Holds the live page handle for one verification iteration and exposes the
/// two-step search action: load the page, then fill and submit the query.
pub struct SearchPage {
    page: Page,
}

impl SearchPage {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Navigate to the landing page.
    pub async fn load(&self) -> Result<()> {
        info!(url = SEARCH_URL, "loading search page");
        self.page
            .goto(SEARCH_URL)
            .await
            .context("failed to navigate to the search landing page")?;
        self.page
            .wait_for_navigation()
            .await
            .context("landing page never finished loading")?;
        Ok(())
    }

    /// Fill the query input, submit, and block until the results container
    /// is attached.
    ///
    /// Control does not return before the results view exists, so a
    /// [`ResultPage`](super::ResultPage) constructed afterwards starts from a
    /// stable state. An empty phrase is passed through as-is; what the
    /// provider does with it is its own business.
    pub async fn search(&self, phrase: &str) -> Result<()> {
        info!(phrase, "submitting search");

        let input = wait_for_selector(&self.page, SEARCH_INPUT_SELECTOR).await?;
        input
            .click()
            .await
            .with_context(|| format!("failed to focus search input '{SEARCH_INPUT_SELECTOR}'"))?;
        input
            .type_str(phrase)
            .await
            .with_context(|| format!("failed to type phrase into '{SEARCH_INPUT_SELECTOR}'"))?;

        let button = wait_for_selector(&self.page, SEARCH_BUTTON_SELECTOR).await?;
        button
            .click()
            .await
            .with_context(|| format!("failed to click search button '{SEARCH_BUTTON_SELECTOR}'"))?;

        // Synchronization point for the whole iteration: results queries may
        // only run after this wait completes.
        wait_for_selector(&self.page, RESULTS_CONTAINER_SELECTOR).await?;
        Ok(())
    }
}
