use anyhow::Result;
use bofa_scraper::clock::FixedClock;
use bofa_scraper::models::Account;
use bofa_scraper::page::MemoryPage;
use bofa_scraper::scraper::{drain_account, AccountKind, Marker, Scraper};
use bofa_scraper::ScrapeError;
use chrono::NaiveDate;

mod support;
use support::{ledger_page, ledger_row, ledger_rows, statement_page, statement_rows};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn clock() -> FixedClock {
    FixedClock::new(date(2024, 6, 15))
}

#[tokio::test]
async fn statement_account_drains_all_periods_additively() -> Result<()> {
    let page = MemoryPage::from_snapshots(vec![
        statement_page("Current transactions", statement_rows("06/01/2024", 25), true),
        statement_page("May 08, 2024", statement_rows("05/01/2024", 25), true),
        statement_page("April 08, 2024", statement_rows("04/01/2024", 10), true),
        statement_page("March 08, 2024", Vec::new(), false),
    ]);
    let mut account = Account::new("Customized Cash Rewards Visa Signature - 9876");
    let scraper = Scraper::for_account(&account)?;
    assert_eq!(scraper.kind(), AccountKind::Statement);

    let report = drain_account(&scraper, &page, &mut account, &clock()).await?;

    assert_eq!(account.transactions().len(), 60);
    assert_eq!(report.cycles, 4);
    assert_eq!(report.advances, 3);
    assert_eq!(report.marker, Marker::Date(date(2024, 3, 8)));
    assert_eq!(page.activations(), 3);
    assert_eq!(page.quiescence_waits(), 3);
    assert!(account
        .transactions()
        .iter()
        .all(|t| t.uuid.is_none() && t.balance.is_some()));
    Ok(())
}

#[tokio::test]
async fn statement_batches_accumulate_cycle_by_cycle() -> Result<()> {
    let page = MemoryPage::from_snapshots(vec![
        statement_page("Current transactions", statement_rows("06/01/2024", 3), true),
        statement_page("May 08, 2024", statement_rows("05/01/2024", 2), true),
        statement_page("April 08, 2024", statement_rows("04/01/2024", 4), false),
    ]);
    let mut account = Account::new("Visa Signature");
    let scraper = Scraper::for_account(&account)?;

    let mut expected = 0;
    for _ in 0..4 {
        let before = account.transactions().len();
        let batch = scraper.scrape_transactions(&page, &mut account).await?;
        expected += batch;
        assert!(account.transactions().len() >= before);
        assert_eq!(account.transactions().len(), expected);
        scraper.load_more_transactions(&page, &account).await?;
    }
    // The last period was read twice: appending does not de-duplicate.
    assert_eq!(expected, 3 + 2 + 4 + 4);
    Ok(())
}

#[tokio::test]
async fn statement_current_period_resolves_to_today() -> Result<()> {
    let page = MemoryPage::new(statement_page(
        "Current transactions",
        statement_rows("06/01/2024", 2),
        false,
    ));
    let mut account = Account::new("Visa Signature");
    let scraper = Scraper::for_account(&account)?;

    let report = drain_account(&scraper, &page, &mut account, &clock()).await?;

    assert_eq!(report.marker, Marker::Date(date(2024, 6, 15)));
    assert_eq!(report.cycles, 2);
    assert_eq!(report.advances, 0);
    assert_eq!(account.transactions().len(), 4);
    Ok(())
}

#[tokio::test]
async fn ledger_account_stops_one_cycle_after_oldest_date_settles() -> Result<()> {
    let first = vec![
        ledger_row("r1", "03/10/2024", "Coffee", "-$4.50"),
        ledger_row("r2", "03/05/2024", "Rent", "-$1,500.00"),
    ];
    let mut second = first.clone();
    second.push(ledger_row("r3", "02/15/2024", "Payroll", "$2,000.00"));
    second.push(ledger_row("r4", "02/20/2024", "Groceries", "-$82.13"));

    let page = MemoryPage::from_snapshots(vec![
        ledger_page(first, true),
        ledger_page(second.clone(), true),
        ledger_page(second, true),
    ]);
    let mut account = Account::new("Adv Plus Banking - 1234");
    let scraper = Scraper::for_account(&account)?;
    assert_eq!(scraper.kind(), AccountKind::Ledger);

    let report = drain_account(&scraper, &page, &mut account, &clock()).await?;

    assert_eq!(report.cycles, 3);
    assert_eq!(report.advances, 3);
    // Minimum over the whole set, not the last row shown.
    assert_eq!(report.marker, Marker::Date(date(2024, 2, 15)));
    // Each cycle replaces the previous read of the same growing page.
    assert_eq!(account.transactions().len(), 4);
    assert_eq!(account.transactions()[0].desc, "Coffee");
    assert_eq!(account.transactions()[2].uuid.as_deref(), Some("r3"));
    Ok(())
}

#[tokio::test]
async fn ledger_last_date_is_minimum_over_accumulated_set() -> Result<()> {
    let page = MemoryPage::new(ledger_page(
        vec![
            ledger_row("a", "01/20/2024", "b", "$1.00"),
            ledger_row("b", "12/31/2023", "c", "$1.00"),
            ledger_row("c", "01/02/2024", "d", "$1.00"),
        ],
        true,
    ));
    let mut account = Account::new("Banking");
    let scraper = Scraper::for_account(&account)?;

    scraper.scrape_transactions(&page, &mut account).await?;
    let marker = scraper.last_date(&page, &account, &clock()).await?;
    assert_eq!(marker, Marker::Date(date(2023, 12, 31)));
    Ok(())
}

#[tokio::test]
async fn ledger_missing_control_aborts_but_keeps_rows() -> Result<()> {
    let page = MemoryPage::new(ledger_page(ledger_rows("x", "04/01/2024", 5), false));
    let mut account = Account::new("Adv Plus Banking - 1234");
    let scraper = Scraper::for_account(&account)?;

    let err = drain_account(&scraper, &page, &mut account, &clock())
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::MissingPaginationControl { .. }));
    assert_eq!(account.transactions().len(), 5);
    Ok(())
}

#[tokio::test]
async fn ledger_unparseable_date_is_fatal() -> Result<()> {
    let page = MemoryPage::new(ledger_page(
        vec![ledger_row("a", "Processing", "Pending charge", "-$3.00")],
        true,
    ));
    let mut account = Account::new("Banking");
    let scraper = Scraper::for_account(&account)?;

    let err = drain_account(&scraper, &page, &mut account, &clock())
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::FieldParse { field: "date", .. }));
    Ok(())
}

#[test]
fn dispatch_by_account_name() {
    for name in ["Adv Plus Banking - 1234", "Banking", "My Banking Savings"] {
        assert_eq!(AccountKind::classify(name).unwrap(), AccountKind::Ledger);
    }
    for name in ["Visa Signature", "Premium Rewards Visa Signature - 42"] {
        assert_eq!(AccountKind::classify(name).unwrap(), AccountKind::Statement);
    }
    for name in ["", "Brokerage", "banking", "Visa Platinum"] {
        let err = AccountKind::classify(name).unwrap_err();
        assert!(matches!(err, ScrapeError::UnsupportedAccountType { .. }));
    }
}
