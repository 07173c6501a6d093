use tracing::info;

use super::{Marker, Scraper};
use crate::clock::Clock;
use crate::error::Result;
use crate::models::Account;
use crate::page::PageQuery;

/// What [`drain_account`] did before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Extract/paginate/measure cycles run, including the final one that saw no progress.
    pub cycles: usize,
    /// Cycles in which a pagination control was actually clicked.
    pub advances: usize,
    pub marker: Marker,
}

/// Scrape `account` until its oldest-date marker stops moving.
///
/// Each cycle extracts the visible rows, asks for the next batch, then
/// re-measures the marker. The loop ends once a whole cycle leaves the marker
/// unchanged, so there is always one trailing cycle after the history runs
/// out. On error the account keeps whatever earlier cycles gathered.
pub async fn drain_account<P: PageQuery>(
    scraper: &Scraper,
    page: &P,
    account: &mut Account,
    clock: &dyn Clock,
) -> Result<DrainReport> {
    let mut previous: Option<Marker> = None;
    let mut cycles = 0;
    let mut advances = 0;

    loop {
        scraper.scrape_transactions(page, account).await?;
        if scraper.load_more_transactions(page, account).await? {
            advances += 1;
        }
        cycles += 1;

        let current = scraper.last_date(page, account, clock).await?;
        info!(account = %account.name, cycle = cycles, marker = %current, "Last date now");

        if previous == Some(current) {
            return Ok(DrainReport {
                cycles,
                advances,
                marker: current,
            });
        }
        previous = Some(current);
    }
}
