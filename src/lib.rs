pub mod account;
pub mod action;
pub mod engine;
pub mod error;

use crate::account::Account;
use crate::action::CsvAction;
use crate::engine::ledger::Ledger;
use crate::error::LedgerError;

use anyhow::Context;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Streams the rows of an action script. A malformed row yields an error
/// item without ending the stream.
pub fn stream_actions<P: AsRef<Path>>(
    path: P,
) -> csv::Result<impl Iterator<Item = csv::Result<CsvAction>>> {
    let rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    Ok(rdr.into_deserialize::<CsvAction>())
}

#[derive(Debug, Deserialize)]
struct CsvAccount {
    owner: String,
    pin: u32,
    interest_rate: Decimal,
    /// Space separated signed amounts.
    movements: String,
}

/// Builds a ledger from an `owner,pin,interest_rate,movements` file. Any bad
/// row fails the whole load.
pub fn load_accounts<P: AsRef<Path>>(path: P) -> anyhow::Result<Ledger> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open accounts file {}", path.display()))?;

    let mut ledger = Ledger::new();
    for (line, record) in rdr.deserialize::<CsvAccount>().enumerate() {
        let row = line + 2;
        let record = record.with_context(|| format!("Invalid account on line {}", row))?;
        let account = parse_account(record).with_context(|| format!("Line {}", row))?;
        ledger.open_account(account)?;
    }

    Ok(ledger)
}

fn parse_account(record: CsvAccount) -> Result<Account, LedgerError> {
    let movements = record
        .movements
        .split_whitespace()
        .map(|amount| {
            Decimal::from_str(amount).map_err(|e| LedgerError::InvalidInput {
                message: format!("Invalid movement '{}': {}", amount, e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Account::new(&record.owner, movements, record.interest_rate, record.pin)
}
