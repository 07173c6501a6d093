//! Signing in and listing accounts on the portal overview page.
//!
//! The passcode is never handled here: the user types it into the browser
//! window and confirms on the terminal.

use std::io::{BufRead, Write};

use tracing::info;

use crate::error::{Result, ScrapeError};
use crate::models::Account;
use crate::page::{Locator, PageElement, PageQuery};

const ONLINE_ID_FIELD: &str = "onlineId1";
const SIGN_IN_BUTTON: &str = "signIn";

/// Something that can wait for the user to confirm a manual step.
pub trait Prompt {
    fn wait_for_enter(&mut self, message: &str) -> std::io::Result<()>;
}

/// Prompts on a terminal: writes the message, reads one line.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn wait_for_enter(&mut self, message: &str) -> std::io::Result<()> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }
}

/// Fill in the online id, let the user enter the passcode, and submit.
///
/// If the sign-in button has already gone (the user submitted the form, or a
/// second factor page is showing) the user is asked to finish logging in by
/// hand. Either way the overview page must list accounts afterwards.
pub async fn login<P: PageQuery>(
    page: &P,
    username: &str,
    account_selector: &Locator,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    info!("Logging in");
    if let Some(field) = page.find(&Locator::id(ONLINE_ID_FIELD)).await? {
        field.type_text(username).await?;
    }

    prompt_user(prompt, "Hit enter when password entered: ")?;

    match page.find(&Locator::id(SIGN_IN_BUTTON)).await? {
        Some(button) => {
            button.activate().await?;
            page.wait_for_quiescence().await;
        }
        None => prompt_user(prompt, "Hit enter when logged in: ")?,
    }

    check_login(page, account_selector).await?;
    info!("Logged in");
    Ok(())
}

/// Succeeds when the overview page shows at least one account.
pub async fn check_login<P: PageQuery>(page: &P, account_selector: &Locator) -> Result<()> {
    if page.find(account_selector).await?.is_none() {
        return Err(ScrapeError::NotLoggedIn {
            locator: account_selector.clone(),
        });
    }
    Ok(())
}

/// Accounts on the overview page, in display order.
///
/// Each entry's first link gives the name (its text) and activity page (its
/// `href`). Entries without a link are kept so the caller can report them.
pub async fn list_accounts<P: PageQuery>(
    page: &P,
    account_selector: &Locator,
) -> Result<Vec<Account>> {
    let mut accounts = Vec::new();
    for item in page.find_all(account_selector).await? {
        let Some(link) = item.find(&Locator::tag("a")).await? else {
            let name = item.text().await?.trim().to_string();
            accounts.push(Account::new(name));
            continue;
        };
        let name = link.text().await?.trim().to_string();
        let account = match link.attribute("href").await? {
            Some(href) => Account::new(name).with_link(href),
            None => Account::new(name),
        };
        accounts.push(account);
    }
    info!(count = accounts.len(), "Found accounts");
    Ok(accounts)
}

fn prompt_user(prompt: &mut dyn Prompt, message: &str) -> Result<()> {
    prompt.wait_for_enter(message).map_err(ScrapeError::Prompt)
}
