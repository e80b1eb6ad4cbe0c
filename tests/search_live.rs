//! Live end-to-end tests against DuckDuckGo.
//!
//! These require a Chrome/Chromium installation and network access, so they
//! are ignored by default. Run with `cargo test -- --ignored`.

use searchcheck::{
    BrowserWrapper, Dataset, ResultPage, SearchPage, VerifyConfig, run_dataset, verify_search,
};

#[tokio::test]
#[ignore] // Requires browser installation and network access
async fn verify_single_phrase_end_to_end() {
    let config = VerifyConfig::default();
    let browser = BrowserWrapper::launch(true).await.unwrap();

    let page = browser.new_blank_page().await.unwrap();
    verify_search(&page, "otter", &config).await.unwrap();

    drop(page);
    browser.shutdown().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires browser installation and network access
async fn result_titles_are_stable_between_reads() {
    let browser = BrowserWrapper::launch(true).await.unwrap();
    let page = browser.new_blank_page().await.unwrap();

    let search_page = SearchPage::new((*page).clone());
    search_page.load().await.unwrap();
    search_page.search("panda").await.unwrap();

    let result_page = ResultPage::new((*page).clone());
    let first = result_page.result_link_titles().await.unwrap();
    let second = result_page.result_link_titles().await.unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);

    drop(page);
    browser.shutdown().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires browser installation and network access
async fn run_small_dataset_end_to_end() {
    let config = VerifyConfig::default();
    let dataset = Dataset::new(vec!["otter".into(), "fox".into()]);
    let browser = BrowserWrapper::launch(true).await.unwrap();

    let report = run_dataset(&browser, &dataset, &config).await;
    assert_eq!(report.outcomes.len(), 2);
    assert!(report.all_passed(), "failures: {}", report.failed());

    browser.shutdown().await.unwrap();
}
