//! Browser lifecycle for the verification harness.
//!
//! Finds or downloads a Chrome/Chromium executable, launches it with a
//! per-instance temp profile, and wraps the live browser plus its CDP event
//! handler task in RAII types so every exit path cleans up.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::ops::Deref;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// User agent reported by the harness browser.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Find a Chrome/Chromium executable on the system.
///
/// Checks the `CHROMIUM_PATH` environment variable first, then
/// platform-specific install locations, then `which` on Unix.
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!(path = %path.display(), "using browser from CHROMIUM_PATH");
            return Ok(path);
        }
        warn!(
            path = %path.display(),
            "CHROMIUM_PATH points to a non-existent file"
        );
    }

    let paths = if cfg!(target_os = "windows") {
        vec![
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        vec![
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        vec![
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    for path_str in paths {
        let path = if let Some(rest) = path_str.strip_prefix("~/") {
            match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            }
        } else {
            PathBuf::from(path_str)
        };

        if path.exists() {
            info!(path = %path.display(), "found browser");
            return Ok(path);
        }
    }

    if !cfg!(target_os = "windows") {
        for cmd in &["chromium", "chromium-browser", "google-chrome", "chrome"] {
            let output = Command::new("which").arg(cmd).output();
            if let Ok(output) = output
                && output.status.success()
            {
                let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path_str.is_empty() {
                    let path = PathBuf::from(path_str);
                    info!(path = %path.display(), "found browser via 'which'");
                    return Ok(path);
                }
            }
        }
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download a managed Chromium build and return its executable path.
///
/// Used as a fallback when no local installation is found.
pub async fn download_managed_browser() -> Result<PathBuf> {
    info!("downloading managed Chromium browser");

    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("searchcheck")
        .join("chromium");

    std::fs::create_dir_all(&cache_dir).context("failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("failed to build fetcher options")?,
    );

    let revision = fetcher.fetch().await.context("failed to download Chromium")?;
    info!(path = %revision.folder_path.display(), "downloaded Chromium");

    Ok(revision.executable_path)
}

/// Launch a browser with a unique temp profile and a tracked handler task.
///
/// Returns (Browser, handler `JoinHandle`, profile dir). The handler MUST be
/// aborted when the browser is done; [`BrowserWrapper`] does this on drop.
pub async fn launch_browser(headless: bool) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let chrome_path = match find_browser_executable().await {
        Ok(path) => path,
        Err(_) => download_managed_browser().await?,
    };

    let user_data_dir =
        std::env::temp_dir().join(format!("searchcheck_chrome_{}", std::process::id()));
    std::fs::create_dir_all(&user_data_dir).context("failed to create user data directory")?;

    let mut config_builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(1920, 1080)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(chrome_path);

    if headless {
        config_builder = config_builder.headless_mode(HeadlessMode::default());
    } else {
        config_builder = config_builder.with_head();
    }

    config_builder = config_builder
        .arg(format!("--user-agent={USER_AGENT}"))
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-infobars")
        .arg("--disable-notifications")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--no-sandbox")
        .arg("--disable-extensions")
        .arg("--disable-popup-blocking")
        .arg("--disable-background-networking")
        .arg("--hide-scrollbars")
        .arg("--mute-audio");

    let browser_config = config_builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

    info!("launching browser");
    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                error!("browser handler error: {e:?}");
            }
        }
        debug!("browser event handler task completed");
    });

    Ok((browser, handler_task, user_data_dir))
}

/// RAII owner of a Browser, its event handler task, and its temp profile.
///
/// The handler MUST be aborted to stop it running after the browser closes,
/// and the profile dir MUST be removed after the Chrome process has exited.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    /// Launch a browser and take ownership of its handler task and profile.
    pub async fn launch(headless: bool) -> Result<Self> {
        let (browser, handler, user_data_dir) = launch_browser(headless).await?;
        Ok(Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        })
    }

    /// Reference to the inner browser.
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Open a fresh blank page behind a guard that closes it on drop.
    pub async fn new_blank_page(&self) -> Result<PageGuard> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create blank page")?;
        Ok(PageGuard::new(page))
    }

    /// Gracefully close the browser, wait for the process to exit, and
    /// remove the temp profile.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("shutting down browser");
        self.browser
            .close()
            .await
            .context("failed to close browser")?;
        self.browser
            .wait()
            .await
            .context("failed to wait for browser exit")?;
        self.handler.abort();
        self.cleanup_temp_dir();
        Ok(())
    }

    /// Remove the temp profile directory.
    ///
    /// Blocking on purpose: this may run from a Drop context where async is
    /// not available, and Chrome must have released its file handles first.
    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!(path = %path.display(), "removing temp profile directory");
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(path = %path.display(), error = %e, "failed to remove temp profile directory");
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        // Fallback if shutdown() was never called. Browser::drop kills the
        // Chrome process.
        if self.user_data_dir.is_some() {
            self.cleanup_temp_dir();
        }
    }
}

/// RAII guard over a live page.
///
/// One guard is held per verification iteration; dropping it closes the page
/// on every exit path, so a failed iteration cannot leak its page into the
/// next one.
pub struct PageGuard {
    page: Option<Page>,
}

impl PageGuard {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page: Some(page) }
    }
}

impl Deref for PageGuard {
    type Target = Page;

    fn deref(&self) -> &Page {
        self.page.as_ref().expect("page present until drop")
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            tokio::spawn(async move {
                if let Err(e) = page.close().await {
                    debug!(error = %e, "failed to close page");
                }
            });
        }
    }
}
