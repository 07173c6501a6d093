//! Drains every account in turn and hands the results to the CSV sink.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::export::save_account;
use crate::models::Account;
use crate::page::{PageError, PageQuery};
use crate::scraper::{drain_account, Scraper};

/// Opens and closes the tab an account is scraped in.
#[async_trait::async_trait]
pub trait TabOpener: Send + Sync {
    type Page: PageQuery;

    async fn open(&self, url: &str) -> Result<Self::Page, PageError>;

    async fn close(&self, page: Self::Page) -> Result<(), PageError>;
}

/// Outcome of a multi-account run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files written, one per account that had transactions.
    pub saved: Vec<PathBuf>,
    /// Accounts whose type is not supported.
    pub skipped: Vec<String>,
    /// Accounts that stopped early, with the reason. Their partial results
    /// are still saved.
    pub failed: Vec<(String, String)>,
}

/// Scrape `accounts` one at a time, each in its own tab.
///
/// Unsupported accounts are skipped without output. Any other per-account
/// failure ends that account's loop but keeps what it had gathered, and the
/// run moves on. Only failing to write a CSV file aborts the run.
pub async fn scrape_accounts<T: TabOpener>(
    tabs: &T,
    accounts: Vec<Account>,
    outdir: &Path,
    clock: &dyn Clock,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for mut account in accounts {
        let scraper = match Scraper::for_account(&account) {
            Ok(scraper) => scraper,
            Err(err) if err.is_unsupported_account() => {
                warn!(account = %account.name, error = %err, "Ignoring account");
                summary.skipped.push(account.name);
                continue;
            }
            Err(err) => {
                summary.failed.push((account.name, err.to_string()));
                continue;
            }
        };

        let Some(link) = account.link.clone() else {
            warn!(account = %account.name, "Account has no link; skipping");
            summary
                .failed
                .push((account.name, "account has no link".to_string()));
            continue;
        };

        info!(account = %account.name, kind = ?scraper.kind(), "Starting scraping session");
        let page = match tabs.open(&link).await {
            Ok(page) => page,
            Err(err) => {
                warn!(account = %account.name, error = %err, "Failed to open account");
                summary.failed.push((account.name, err.to_string()));
                continue;
            }
        };
        info!(account = %account.name, "Tab opened");

        let drained = drain_account(&scraper, &page, &mut account, clock).await;

        info!(account = %account.name, "Closing tab");
        if let Err(err) = tabs.close(page).await {
            warn!(account = %account.name, error = %err, "Failed to close tab");
        }

        match drained {
            Ok(report) => info!(
                account = %account.name,
                cycles = report.cycles,
                transactions = account.transactions().len(),
                oldest = %report.marker,
                "Finished account"
            ),
            Err(err) => {
                warn!(
                    account = %account.name,
                    error = %err,
                    kept = account.transactions().len(),
                    "Scraping stopped early"
                );
                summary.failed.push((account.name.clone(), err.to_string()));
            }
        }

        if let Some(path) = save_account(&account, outdir)? {
            summary.saved.push(path);
        }
    }

    Ok(summary)
}
