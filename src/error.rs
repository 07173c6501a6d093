use crate::page::{Locator, PageError};

/// Failures while scraping one account.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The account name matches no known scraper. Callers skip the account.
    #[error("unknown account type: {name}")]
    UnsupportedAccountType { name: String },

    /// The ledger page has no "view more" control to click.
    #[error("no \"view more transactions\" control on account {account}")]
    MissingPaginationControl { account: String },

    /// Displayed text did not follow the expected convention.
    #[error("could not parse {field} from {raw:?}: {reason}")]
    FieldParse {
        field: &'static str,
        raw: String,
        reason: String,
    },

    #[error("missing {locator}")]
    MissingElement { locator: Locator },

    #[error("not logged in: no accounts found with {locator}")]
    NotLoggedIn { locator: Locator },

    #[error("failed to read confirmation from the terminal")]
    Prompt(#[source] std::io::Error),

    #[error(transparent)]
    Page(#[from] PageError),
}

impl ScrapeError {
    pub fn field_parse(field: &'static str, raw: &str, reason: impl ToString) -> Self {
        Self::FieldParse {
            field,
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the caller should skip this account and keep going.
    pub fn is_unsupported_account(&self) -> bool {
        matches!(self, Self::UnsupportedAccountType { .. })
    }
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
