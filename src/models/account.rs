use super::Transaction;

/// An account listed on the portal overview page.
///
/// The display name doubles as the account-type signal used to choose a
/// scraper. Transactions are empty until the first extraction cycle.
#[derive(Debug, Clone, Default)]
pub struct Account {
    pub name: String,
    /// Link to the account's activity page, taken from the overview entry.
    pub link: Option<String>,
    pub transactions: Vec<Transaction>,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: None,
            transactions: Vec::new(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Replace everything held so far with `transactions`.
    pub fn set_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }

    /// Append `transactions` after everything held so far. No de-duplication.
    pub fn extend_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions.extend(transactions);
    }
}
