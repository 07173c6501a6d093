#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bofa_scraper::page::{MemoryPage, PageError};
use bofa_scraper::runner::TabOpener;
use bofa_scraper::session::Prompt;

pub const PERIOD_SELECT_ID: &str = "goto_select_trans_top";
const CURRENT_PERIOD: &str = "Current transactions";

pub fn ledger_row(id: &str, date: &str, desc: &str, amount: &str) -> String {
    format!(
        r##"<div class="activity-row {id} cleared">
              <div class="date-cell">{date}</div>
              <div class="desc-cell">{desc}<a href="#edit">View/Edit</a></div>
              <div class="type-cell">Debit</div>
              <div class="amount-cell">{amount}</div>
            </div>"##
    )
}

/// A ledger page showing `rows`, optionally with the "view more" control.
pub fn ledger_page(rows: Vec<String>, view_more: bool) -> String {
    let more = if view_more {
        r##"<a class="view-more-transactions" href="#more">View more</a>"##
    } else {
        ""
    };
    format!(
        r#"<html><body><div class="activity-list">{}</div>{more}</body></html>"#,
        rows.concat()
    )
}

/// `count` rows on one ledger date, ids prefixed by `prefix`.
pub fn ledger_rows(prefix: &str, date: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| ledger_row(&format!("{prefix}{i}"), date, &format!("Row {i}"), "-$1.00"))
        .collect()
}

pub fn statement_row(date: &str, desc: &str, amount: &str, balance: &str) -> String {
    format!(
        r#"<tr>
             <td class="trans-date-cell">{date}</td>
             <td class="trans-desc-cell">{desc}</td>
             <td class="trans-type-cell"><div class="icon icon-type-purchase"></div></td>
             <td class="trans-amount-cell">{amount}</td>
             <td class="trans-balance-cell">{balance}</td>
           </tr>"#
    )
}

pub fn statement_rows(date: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| statement_row(date, &format!("Charge {i}"), "$10.01", "$1,000.00"))
        .collect()
}

/// One statement period: the selector shows `label`, and "Previous
/// transactions" is present when `has_previous`.
pub fn statement_page(label: &str, rows: Vec<String>, has_previous: bool) -> String {
    let options = if label == CURRENT_PERIOD {
        format!("<option selected>{CURRENT_PERIOD}</option>")
    } else {
        format!("<option>{CURRENT_PERIOD}</option><option selected>{label}</option>")
    };
    let previous = if has_previous {
        r##"<a href="#prev">Previous transactions</a>"##
    } else {
        ""
    };
    format!(
        r#"<html><body>
             <select id="{PERIOD_SELECT_ID}">{options}</select>
             <table class="transactions">
               <tbody class="trans-tbody-wrap">{}</tbody>
             </table>
             {previous}
           </body></html>"#,
        rows.concat()
    )
}

/// Tabs served from fixed [`MemoryPage`]s keyed by URL.
#[derive(Default)]
pub struct MemoryTabs {
    pages: HashMap<String, MemoryPage>,
    opened: Mutex<Vec<String>>,
    closed: Mutex<usize>,
}

impl MemoryTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: MemoryPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn closed(&self) -> usize {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl TabOpener for MemoryTabs {
    type Page = MemoryPage;

    async fn open(&self, url: &str) -> Result<MemoryPage, PageError> {
        self.opened.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| PageError::Browser(format!("no page at {url}")))
    }

    async fn close(&self, _page: MemoryPage) -> Result<(), PageError> {
        *self.closed.lock().unwrap() += 1;
        Ok(())
    }
}

/// Records prompts instead of reading a terminal.
#[derive(Debug, Default)]
pub struct RecordingPrompt {
    pub messages: Vec<String>,
}

impl Prompt for RecordingPrompt {
    fn wait_for_enter(&mut self, message: &str) -> std::io::Result<()> {
        self.messages.push(message.to_string());
        Ok(())
    }
}
