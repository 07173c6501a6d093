use bofa_scraper::page::{Locator, MemoryPage};
use bofa_scraper::session::{list_accounts, login};
use bofa_scraper::ScrapeError;

mod support;
use support::RecordingPrompt;

fn login_form(with_button: bool) -> String {
    let button = if with_button {
        r#"<button id="signIn">Log In</button>"#
    } else {
        ""
    };
    format!(r#"<html><body><form><input id="onlineId1">{button}</form></body></html>"#)
}

fn overview() -> String {
    r#"<html><body>
         <div class="AccountItem AccountItemDeposit">
           <a href="/checking">Adv Plus Banking - 1234</a>
           <span class="balance">$1,000.00</span>
         </div>
         <div class="AccountItem">
           <a href="/card">Customized Cash Rewards Visa Signature - 9876</a>
         </div>
         <div class="AccountItem">Closed Savings</div>
       </body></html>"#
        .to_string()
}

fn selector() -> Locator {
    Locator::css(".AccountItem")
}

#[tokio::test]
async fn signs_in_and_lists_accounts() {
    let page = MemoryPage::from_snapshots(vec![login_form(true), overview()]);
    let mut prompt = RecordingPrompt::default();

    login(&page, "jdoe", &selector(), &mut prompt).await.unwrap();

    assert_eq!(page.typed_text(), vec!["jdoe".to_string()]);
    assert_eq!(prompt.messages, vec!["Hit enter when password entered: ".to_string()]);
    assert_eq!(page.current_snapshot(), 1);
    assert_eq!(page.quiescence_waits(), 1);

    let accounts = list_accounts(&page, &selector()).await.unwrap();
    let names: Vec<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Adv Plus Banking - 1234",
            "Customized Cash Rewards Visa Signature - 9876",
            "Closed Savings"
        ]
    );
    assert_eq!(accounts[0].link.as_deref(), Some("/checking"));
    assert_eq!(accounts[1].link.as_deref(), Some("/card"));
    assert_eq!(accounts[2].link, None);
}

#[tokio::test]
async fn asks_user_to_finish_when_button_is_gone() {
    // The form was already submitted by hand; the overview is what is showing.
    let page = MemoryPage::new(overview());
    let mut prompt = RecordingPrompt::default();

    login(&page, "jdoe", &selector(), &mut prompt).await.unwrap();

    assert!(page.typed_text().is_empty());
    assert_eq!(
        prompt.messages,
        vec![
            "Hit enter when password entered: ".to_string(),
            "Hit enter when logged in: ".to_string(),
        ]
    );
}

#[tokio::test]
async fn no_accounts_after_sign_in_is_not_logged_in() {
    let page = MemoryPage::from_snapshots(vec![login_form(true), login_form(false)]);
    let mut prompt = RecordingPrompt::default();

    let err = login(&page, "jdoe", &selector(), &mut prompt).await.unwrap_err();
    assert!(matches!(err, ScrapeError::NotLoggedIn { .. }));
}
