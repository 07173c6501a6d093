//! Per-account scraping: choosing a page variant, extracting rows, paging
//! back through history, and deciding when there is nothing left.

mod convergence;
mod ledger;
pub mod parse;
mod statement;

pub use convergence::{drain_account, DrainReport};
pub use ledger::LedgerScraper;
pub use statement::{type_code, StatementScraper};

use std::fmt;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::{Result, ScrapeError};
use crate::models::Account;
use crate::page::PageQuery;

/// Page layouts the portal uses for account activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// Checking/savings: one page that keeps growing.
    Ledger,
    /// Credit card: one statement period at a time.
    Statement,
}

impl AccountKind {
    /// Classify an account by its display name.
    pub fn classify(name: &str) -> Result<Self> {
        if name.contains("Banking") {
            Ok(Self::Ledger)
        } else if name.contains("Visa Signature") {
            Ok(Self::Statement)
        } else {
            Err(ScrapeError::UnsupportedAccountType {
                name: name.to_string(),
            })
        }
    }
}

/// How far back the scraped history reaches, compared cycle to cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Nothing scraped yet.
    Empty,
    Date(NaiveDate),
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Empty => f.write_str("none"),
            Marker::Date(date) => write!(f, "{date}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scraper {
    Ledger(LedgerScraper),
    Statement(StatementScraper),
}

impl Scraper {
    pub fn for_kind(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Ledger => Self::Ledger(LedgerScraper),
            AccountKind::Statement => Self::Statement(StatementScraper),
        }
    }

    /// Pick the scraper for `account`, failing with
    /// [`ScrapeError::UnsupportedAccountType`] for names it doesn't recognize.
    pub fn for_account(account: &Account) -> Result<Self> {
        AccountKind::classify(&account.name).map(Self::for_kind)
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            Self::Ledger(_) => AccountKind::Ledger,
            Self::Statement(_) => AccountKind::Statement,
        }
    }

    /// Extract the rows on screen into `account`. Returns the batch size.
    pub async fn scrape_transactions<P: PageQuery>(
        &self,
        page: &P,
        account: &mut Account,
    ) -> Result<usize> {
        match self {
            Self::Ledger(s) => s.scrape_transactions(page, account).await,
            Self::Statement(s) => s.scrape_transactions(page, account).await,
        }
    }

    /// Ask the page for the next batch. Returns whether a control was clicked.
    pub async fn load_more_transactions<P: PageQuery>(
        &self,
        page: &P,
        account: &Account,
    ) -> Result<bool> {
        match self {
            Self::Ledger(s) => s.load_more_transactions(page, account).await.map(|()| true),
            Self::Statement(s) => s.load_more_transactions(page, account).await,
        }
    }

    pub async fn last_date<P: PageQuery>(
        &self,
        page: &P,
        account: &Account,
        clock: &dyn Clock,
    ) -> Result<Marker> {
        match self {
            Self::Ledger(s) => s.last_date(account),
            Self::Statement(s) => s.last_date(page, clock).await,
        }
    }
}
