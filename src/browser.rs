//! Chrome-driven end-to-end run: sign in, list accounts, scrape each one.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::Handler;
use futures::StreamExt;
use tracing::info;

use crate::clock::SystemClock;
use crate::config::ResolvedConfig;
use crate::page::{ChromiumPage, Locator, PageError};
use crate::runner::{scrape_accounts, RunSummary, TabOpener};
use crate::session::{list_accounts, login, TerminalPrompt};

/// Opens accounts as new tabs of one browser.
pub struct BrowserTabs<'a> {
    browser: &'a Browser,
    settle: Duration,
}

impl<'a> BrowserTabs<'a> {
    pub fn new(browser: &'a Browser, settle: Duration) -> Self {
        Self { browser, settle }
    }
}

#[async_trait::async_trait]
impl TabOpener for BrowserTabs<'_> {
    type Page = ChromiumPage;

    async fn open(&self, url: &str) -> Result<ChromiumPage, PageError> {
        ChromiumPage::open(self.browser, url, self.settle).await
    }

    async fn close(&self, page: ChromiumPage) -> Result<(), PageError> {
        page.close().await?;
        info!("Closed");
        Ok(())
    }
}

/// Sign in as `username` and write one CSV per supported account into `outdir`.
pub async fn scrape(config: &ResolvedConfig, username: &str, outdir: &Path) -> Result<RunSummary> {
    let (browser, mut handler) = launch_browser(config).await?;
    let handler_task = tokio::spawn(async move { while (handler.next().await).is_some() {} });

    let result = async {
        let overview = ChromiumPage::open(&browser, &config.login_url, config.timeout)
            .await
            .context("Failed to open the login page")?;

        let selector = Locator::css(config.account_selector.as_str());
        let mut prompt = TerminalPrompt::stdio();
        login(&overview, username, &selector, &mut prompt)
            .await
            .context("Login failed")?;

        let accounts = list_accounts(&overview, &selector).await?;
        let tabs = BrowserTabs::new(&browser, config.timeout);
        scrape_accounts(&tabs, accounts, outdir, &SystemClock).await
    }
    .await;

    drop(browser);
    handler_task.abort();

    result
}

async fn launch_browser(config: &ResolvedConfig) -> Result<(Browser, Handler)> {
    let chrome_path = match &config.chrome_path {
        Some(path) => path.display().to_string(),
        None => find_chrome().context(
            "Chrome/Chromium not found. Install it or set chrome_path in the config file.",
        )?,
    };
    info!(chrome = %chrome_path, headless = config.headless, "Launching browser");

    let mut builder = BrowserConfig::builder()
        .chrome_executable(chrome_path)
        .viewport(None)
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-infobars")
        .arg("--no-first-run")
        .arg("--no-default-browser-check");
    if !config.headless {
        builder = builder.with_head();
    }
    let browser_config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to configure browser: {e}"))?;

    let (browser, handler) = Browser::launch(browser_config)
        .await
        .context("Failed to launch browser")?;

    Ok((browser, handler))
}

/// Find a Chrome/Chromium executable on `PATH` or in the usual install locations.
fn find_chrome() -> Option<String> {
    for name in ["google-chrome", "chromium"] {
        if let Ok(output) = std::process::Command::new("which").arg(name).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Some(path);
                }
            }
        }
    }

    let candidates = [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        "/run/current-system/sw/bin/google-chrome",
        "/run/current-system/sw/bin/chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(str::to_string)
}
