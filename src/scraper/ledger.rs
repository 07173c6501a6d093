//! Checking/savings accounts: every transaction sits on one page that grows
//! each time "view more" is clicked.

use tracing::{debug, info};

use super::parse::{self, cell_text};
use super::Marker;
use crate::error::{Result, ScrapeError};
use crate::models::{Account, Amount, Transaction};
use crate::page::{Locator, PageElement, PageQuery};

const ROW_CLASS: &str = "activity-row";
const AMOUNT_CELL: &str = "amount-cell";
const DATE_CELL: &str = "date-cell";
const DESC_CELL: &str = "desc-cell";
const TYPE_CELL: &str = "type-cell";
const VIEW_MORE_CLASS: &str = "view-more-transactions";
/// Link rendered inside the description cell.
const EDIT_LABEL: &str = "\nView/Edit";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerScraper;

impl LedgerScraper {
    /// Re-read every visible row and replace the account's transactions with them.
    pub async fn scrape_transactions<P: PageQuery>(
        &self,
        page: &P,
        account: &mut Account,
    ) -> Result<usize> {
        info!(account = %account.name, "Scraping bank transactions");

        let rows = page.find_all(&Locator::class(ROW_CLASS)).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(read_row(row).await?);
        }

        let found = out.len();
        info!(account = %account.name, found, "Found transactions");
        account.set_transactions(out);
        Ok(found)
    }

    /// Click "view more". A missing control is an error for this page type.
    pub async fn load_more_transactions<P: PageQuery>(
        &self,
        page: &P,
        account: &Account,
    ) -> Result<()> {
        info!(account = %account.name, "Loading more transactions");

        let control = page
            .find(&Locator::class(VIEW_MORE_CLASS))
            .await?
            .ok_or_else(|| ScrapeError::MissingPaginationControl {
                account: account.name.clone(),
            })?;
        control.activate().await?;
        page.wait_for_quiescence().await;

        info!(account = %account.name, "Loaded more transactions");
        Ok(())
    }

    /// Oldest date over everything the account holds.
    pub fn last_date(&self, account: &Account) -> Result<Marker> {
        let mut oldest = None;
        for tx in account.transactions() {
            let date = parse::ledger_date(&tx.date)?;
            oldest = Some(oldest.map_or(date, |o: chrono::NaiveDate| o.min(date)));
        }
        Ok(oldest.map_or(Marker::Empty, Marker::Date))
    }
}

async fn read_row<E: PageElement>(row: &E) -> Result<Transaction> {
    let amount = parse::float_amount(&cell_text(row, &Locator::class(AMOUNT_CELL)).await?)?;
    let date = cell_text(row, &Locator::class(DATE_CELL)).await?;
    let desc = cell_text(row, &Locator::class(DESC_CELL))
        .await?
        .replace(EDIT_LABEL, "");
    let kind = cell_text(row, &Locator::class(TYPE_CELL)).await?;
    // The second class token is a per-row id, e.g. `activity-row 7f3a91c2`.
    let uuid = row
        .attribute("class")
        .await?
        .and_then(|classes| classes.split_whitespace().nth(1).map(str::to_string));

    let tx = Transaction::new(date, desc, Amount::Float(amount))
        .with_kind(Some(kind))
        .with_uuid(uuid);
    debug!(?tx, "Parsed ledger row");
    Ok(tx)
}
