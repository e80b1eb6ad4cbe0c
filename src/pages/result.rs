//! `ResultPage`, the page object for the DuckDuckGo results page.

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use tracing::debug;

use super::{RESULT_SEARCH_INPUT_SELECTOR, RESULT_TITLE_SELECTOR, wait_for_selector};

/// Count how many titles contain `phrase`, case-insensitively.
///
/// This is the one containment predicate the harness uses: substring match,
/// not exact or tokenized.
#[must_use]
pub fn count_titles_containing(titles: &[String], phrase: &str) -> usize {
    let needle = phrase.to_lowercase();
    titles
        .iter()
        .filter(|title| title.to_lowercase().contains(&needle))
        .count()
}

/// Page object for the DuckDuckGo results page.
///
/// Read-only: every operation queries the current DOM and mutates nothing,
/// so repeated calls without an intervening search return the same data.
pub struct ResultPage {
    page: Page,
}

impl ResultPage {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// All result link titles, in DOM order.
    ///
    /// Waits for the first result link before reading the list. Waiting on
    /// the first element does not guarantee the whole list has stabilized;
    /// the list query is assumed consistent once the first link is attached.
    pub async fn result_link_titles(&self) -> Result<Vec<String>> {
        wait_for_selector(&self.page, RESULT_TITLE_SELECTOR).await?;

        let links = self
            .page
            .find_elements(RESULT_TITLE_SELECTOR)
            .await
            .with_context(|| format!("failed to query result links '{RESULT_TITLE_SELECTOR}'"))?;

        let mut titles = Vec::with_capacity(links.len());
        for link in links {
            let text = link
                .inner_text()
                .await
                .with_context(|| {
                    format!("failed to read text of result link '{RESULT_TITLE_SELECTOR}'")
                })?
                .unwrap_or_default();
            titles.push(text);
        }

        debug!(count = titles.len(), "collected result link titles");
        Ok(titles)
    }

    /// True when at least `minimum` result titles contain `phrase`
    /// (case-insensitive substring).
    pub async fn result_link_titles_contain_phrase(
        &self,
        phrase: &str,
        minimum: usize,
    ) -> Result<bool> {
        let titles = self.result_link_titles().await?;
        Ok(count_titles_containing(&titles, phrase) >= minimum)
    }

    /// Current value of the results-page search input.
    pub async fn search_input_value(&self) -> Result<String> {
        wait_for_selector(&self.page, RESULT_SEARCH_INPUT_SELECTOR).await?;

        let js = format!("document.querySelector('{RESULT_SEARCH_INPUT_SELECTOR}').value");
        let value: String = self
            .page
            .evaluate(js)
            .await
            .context("failed to read the search input value")?
            .into_value()
            .context("search input value was not a string")?;
        Ok(value)
    }

    /// Current document title.
    pub async fn page_title(&self) -> Result<String> {
        let title = self
            .page
            .get_title()
            .await
            .context("failed to read the page title")?;
        Ok(title.unwrap_or_default())
    }
}
