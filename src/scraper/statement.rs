//! Credit card accounts: one statement period is shown at a time and
//! "Previous transactions" steps back to the period before it.

use tracing::{debug, info};

use super::parse::{self, cell_text};
use super::Marker;
use crate::clock::Clock;
use crate::error::{Result, ScrapeError};
use crate::models::{Account, Amount, Transaction};
use crate::page::{Locator, PageElement, PageQuery};

const ROWS: &str = "tbody.trans-tbody-wrap tr";
const DATE_CELL: &str = "trans-date-cell";
const DESC_CELL: &str = "trans-desc-cell";
const AMOUNT_CELL: &str = "trans-amount-cell";
const BALANCE_CELL: &str = "trans-balance-cell";
const TYPE_ICON: &str = ".trans-type-cell div";
const TYPE_PREFIX: &str = "icon-type-";
const PREVIOUS_LABEL: &str = "Previous transactions";
const PERIOD_SELECT_ID: &str = "goto_select_trans_top";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementScraper;

impl StatementScraper {
    /// Read the rows of the period on screen and append them to the account.
    pub async fn scrape_transactions<P: PageQuery>(
        &self,
        page: &P,
        account: &mut Account,
    ) -> Result<usize> {
        info!(account = %account.name, "Scraping credit transactions");

        let rows = page.find_all(&Locator::css(ROWS)).await?;
        info!(account = %account.name, rows = rows.len(), "Found rows");

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(read_row(row).await?);
        }

        let found = out.len();
        info!(account = %account.name, found, "Found transactions");
        account.extend_transactions(out);
        Ok(found)
    }

    /// Step back one statement period.
    ///
    /// Returns `false` without touching the page when there is no earlier
    /// period; that is the normal end of the history, not an error.
    pub async fn load_more_transactions<P: PageQuery>(
        &self,
        page: &P,
        account: &Account,
    ) -> Result<bool> {
        info!(account = %account.name, "Loading more transactions");

        let Some(control) = page.find(&Locator::link_text(PREVIOUS_LABEL)).await? else {
            info!(account = %account.name, "Out of transactions");
            return Ok(false);
        };
        control.activate().await?;
        page.wait_for_quiescence().await;

        info!(account = %account.name, "Loaded more transactions");
        Ok(true)
    }

    /// Date of the statement period currently selected on the page.
    pub async fn last_date<P: PageQuery>(&self, page: &P, clock: &dyn Clock) -> Result<Marker> {
        let locator = Locator::id(PERIOD_SELECT_ID);
        let label = page
            .selected_option_text(&locator)
            .await?
            .ok_or(ScrapeError::MissingElement { locator })?;
        Ok(Marker::Date(parse::statement_period(&label, clock)?))
    }
}

/// Type code from the icon's classes: the last `icon-type-*` token, if any.
pub fn type_code(classes: &str) -> Option<String> {
    classes
        .split_whitespace()
        .filter_map(|token| token.strip_prefix(TYPE_PREFIX))
        .last()
        .map(str::to_string)
}

async fn read_row<E: PageElement>(row: &E) -> Result<Transaction> {
    let date = cell_text(row, &Locator::class(DATE_CELL)).await?;
    let desc = cell_text(row, &Locator::class(DESC_CELL)).await?;
    let amount = parse::decimal_amount(
        "amount",
        &cell_text(row, &Locator::class(AMOUNT_CELL)).await?,
    )?;
    let balance = parse::decimal_amount(
        "balance",
        &cell_text(row, &Locator::class(BALANCE_CELL)).await?,
    )?;

    let icon_locator = Locator::css(TYPE_ICON);
    let icon = row
        .find(&icon_locator)
        .await?
        .ok_or(ScrapeError::MissingElement {
            locator: icon_locator,
        })?;
    let kind = icon.attribute("class").await?.as_deref().and_then(type_code);

    let tx = Transaction::new(date, desc, Amount::Exact(amount))
        .with_kind(kind)
        .with_balance(balance);
    debug!(?tx, "Parsed statement row");
    Ok(tx)
}
