//! CSV output: one file per account, plus merging those files together.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::models::{Account, Transaction};

/// Column order of exported files.
pub const COLUMNS: [&str; 5] = ["uuid", "type", "date", "desc", "amount"];

/// One exported row. The statement balance is deliberately not a column.
#[derive(Debug, Serialize)]
struct Row<'a> {
    uuid: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    date: &'a str,
    desc: &'a str,
    amount: String,
}

impl<'a> From<&'a Transaction> for Row<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            uuid: tx.uuid.as_deref().unwrap_or_default(),
            kind: tx.kind.as_deref().unwrap_or_default(),
            date: &tx.date,
            desc: &tx.desc,
            amount: tx.amount.to_string(),
        }
    }
}

/// Write `transactions` as CSV with a header row, in the order given.
pub fn write_transactions(transactions: &[Transaction], writer: impl Write) -> csv::Result<()> {
    // Header goes out even when there are no rows.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(COLUMNS)?;
    for tx in transactions {
        writer.serialize(Row::from(tx))?;
    }
    writer.flush()?;
    Ok(())
}

/// File name for an account's export; path separators in the name are replaced.
pub fn file_name(account: &Account) -> String {
    let name: String = account
        .name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{name}.csv")
}

/// Write `{outdir}/{name}.csv` for `account`.
///
/// Accounts without transactions get no file; `None` is returned for them.
pub fn save_account(account: &Account, outdir: &Path) -> Result<Option<PathBuf>> {
    if account.transactions().is_empty() {
        info!(account = %account.name, "No transactions");
        return Ok(None);
    }

    std::fs::create_dir_all(outdir)
        .with_context(|| format!("Failed to create output dir: {}", outdir.display()))?;
    let path = outdir.join(file_name(account));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_transactions(account.transactions(), file)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        account = %account.name,
        rows = account.transactions().len(),
        path = %path.display(),
        "Saved transactions"
    );
    Ok(Some(path))
}

/// Concatenate CSV files into `writer`.
///
/// The header is the union of all input columns in order of first
/// appearance; cells a file has no column for are left empty.
pub fn merge_csv(inputs: &[PathBuf], writer: impl Write) -> Result<()> {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<HashMap<String, String>> = Vec::new();

    for path in inputs {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?
            .clone();
        debug!(file = %path.display(), ?headers, "Merging");

        for header in &headers {
            if !columns.iter().any(|c| c == header) {
                columns.push(header.to_string());
            }
        }
        for record in reader.records() {
            let record =
                record.with_context(|| format!("Failed to read row of {}", path.display()))?;
            rows.push(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(h, v)| (h.to_string(), v.to_string()))
                    .collect(),
            );
        }
    }
    debug!(?columns, rows = rows.len(), "Merged columns");

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&columns)?;
    for row in &rows {
        writer.write_record(
            columns
                .iter()
                .map(|c| row.get(c).map(String::as_str).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}
