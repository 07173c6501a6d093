//! Text conventions used on the activity pages.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::error::{Result, ScrapeError};
use crate::page::{Locator, PageElement};

/// Ledger rows show dates as `01/31/2024`.
pub const LEDGER_DATE_FORMAT: &str = "%m/%d/%Y";
/// Statement selector labels look like `January 31, 2024`.
pub const STATEMENT_LABEL_FORMAT: &str = "%B %d, %Y";
/// Selector label for the live, not yet closed, statement period.
pub const CURRENT_PERIOD_LABEL: &str = "Current transactions";

fn strip_money(text: &str) -> String {
    text.trim().replace(',', "").replace('$', "")
}

/// `"$1,234.56"` -> `1234.56` as floating point.
pub fn float_amount(text: &str) -> Result<f64> {
    strip_money(text)
        .parse::<f64>()
        .map_err(|e| ScrapeError::field_parse("amount", text, e))
}

/// `"$1,234.56"` -> exactly `1234.56`.
pub fn decimal_amount(field: &'static str, text: &str) -> Result<Decimal> {
    Decimal::from_str(&strip_money(text)).map_err(|e| ScrapeError::field_parse(field, text, e))
}

pub fn ledger_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), LEDGER_DATE_FORMAT)
        .map_err(|e| ScrapeError::field_parse("date", text, e))
}

/// Date a statement selector label stands for. The live period is today.
pub fn statement_period(label: &str, clock: &dyn Clock) -> Result<NaiveDate> {
    let label = label.trim();
    if label == CURRENT_PERIOD_LABEL {
        return Ok(clock.today());
    }
    NaiveDate::parse_from_str(label, STATEMENT_LABEL_FORMAT)
        .map_err(|e| ScrapeError::field_parse("statement period", label, e))
}

/// Text of the first descendant of `scope` matched by `locator`.
pub async fn cell_text<E: PageElement>(scope: &E, locator: &Locator) -> Result<String> {
    let cell = scope
        .find(locator)
        .await?
        .ok_or_else(|| ScrapeError::MissingElement {
            locator: locator.clone(),
        })?;
    Ok(cell.text().await?)
}
