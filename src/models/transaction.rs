use std::fmt;

use rust_decimal::Decimal;

/// A transaction amount as read from the portal.
///
/// Ledger (checking/savings) pages are parsed as floating point while
/// statement (credit card) pages keep exact decimals. Neither is converted
/// into the other, so the exported text differs between the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Float(f64),
    Exact(Decimal),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole amounts keep their fractional part: `2000.0`.
            Amount::Float(v) => write!(f, "{v:?}"),
            Amount::Exact(v) => write!(f, "{v}"),
        }
    }
}

/// One row scraped from an account's activity page.
///
/// Built fresh on every extraction cycle and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Date exactly as displayed; the format depends on the page it came from.
    pub date: String,
    pub desc: String,
    pub amount: Amount,
    /// Category text (ledger) or icon type code (statement).
    pub kind: Option<String>,
    /// Running balance, only shown on statement pages.
    pub balance: Option<Decimal>,
    /// Row identifier, only exposed on ledger pages.
    pub uuid: Option<String>,
}

impl Transaction {
    pub fn new(date: impl Into<String>, desc: impl Into<String>, amount: Amount) -> Self {
        Self {
            date: date.into(),
            desc: desc.into(),
            amount,
            kind: None,
            balance: None,
            uuid: None,
        }
    }

    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_uuid(mut self, uuid: Option<String>) -> Self {
        self.uuid = uuid;
        self
    }
}
