use crate::account::Account;
use crate::engine::projection::{compute_balance, compute_summary};
use crate::error::LedgerError;

use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: Vec<Account>,
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    username: &'a str,
    owner: &'a str,
    balance: Decimal,
    income: Decimal,
    expenses: Decimal,
    interest: Decimal,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
        }
    }

    /// The four demo accounts every run starts from.
    pub fn seed() -> Result<Self, LedgerError> {
        let seed: [(&str, &[i64], Decimal, u32); 4] = [
            (
                "Jonas Schmedtmann",
                &[200, 450, -400, 3000, -650, -130, 70, 1300],
                Decimal::new(12, 1),
                1111,
            ),
            (
                "Jessica Davis",
                &[5000, 3400, -150, -790, -3210, -1000, 8500, -30],
                Decimal::new(15, 1),
                2222,
            ),
            (
                "Steven Thomas Williams",
                &[200, -200, 340, -300, -20, 50, 400, -460],
                Decimal::new(7, 1),
                3333,
            ),
            (
                "Sarah Smith",
                &[430, 1000, 700, 50, 90],
                Decimal::ONE,
                4444,
            ),
        ];

        let accounts = seed
            .into_iter()
            .map(|(owner, movements, rate, pin)| {
                let movements = movements.iter().copied().map(Decimal::from).collect();
                Account::new(owner, movements, rate, pin)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_accounts(accounts)
    }

    pub fn from_accounts<I>(accounts: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = Account>,
    {
        let mut ledger = Self::new();
        for account in accounts {
            ledger.open_account(account)?;
        }
        Ok(ledger)
    }

    /// Adds an account, refusing a username that is already taken.
    pub fn open_account(&mut self, account: Account) -> Result<(), LedgerError> {
        if self.find_by_username(account.username()).is_some() {
            return Err(LedgerError::DuplicateUsername(
                account.username().to_string(),
            ));
        }

        self.accounts.push(account);
        Ok(())
    }

    pub fn find_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.username() == username)
    }

    pub fn find_by_username_mut(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|account| account.username() == username)
    }

    pub fn remove_account(&mut self, username: &str) -> Result<Account, LedgerError> {
        let index = self
            .accounts
            .iter()
            .position(|account| account.username() == username)
            .ok_or_else(|| LedgerError::AccountNotFound(username.to_string()))?;

        Ok(self.accounts.remove(index))
    }

    /// Moves `amount` between two distinct accounts, charging the sender first.
    ///
    /// Both accounts are resolved before anything is written, so a failed
    /// transfer leaves the ledger untouched. Business rules (positive amount,
    /// sufficient balance) belong to the session.
    pub fn transfer(&mut self, from: &str, to: &str, amount: Decimal) -> Result<(), LedgerError> {
        if from == to {
            return Err(LedgerError::InvalidInput {
                message: format!("Cannot transfer from {} to itself", from),
            });
        }

        for username in [from, to] {
            if self.find_by_username(username).is_none() {
                return Err(LedgerError::AccountNotFound(username.to_string()));
            }
        }

        if let Some(sender) = self.find_by_username_mut(from) {
            sender.record_movement(-amount);
        }
        if let Some(recipient) = self.find_by_username_mut(to) {
            recipient.record_movement(amount);
        }

        Ok(())
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of every movement held by the bank.
    pub fn total_balance(&self) -> Result<Decimal, LedgerError> {
        self.accounts.iter().try_fold(
            Decimal::ZERO,
            |total, account| -> Result<Decimal, LedgerError> {
                total
                    .checked_add(compute_balance(account)?)
                    .ok_or(LedgerError::Overflow("total balance"))
            },
        )
    }

    pub fn dump_accounts<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        for account in &self.accounts {
            let summary = compute_summary(account)?;
            wtr.serialize(ReportRow {
                username: account.username(),
                owner: account.owner(),
                balance: for_report(compute_balance(account)?),
                income: for_report(summary.income),
                expenses: for_report(summary.expenses),
                interest: for_report(summary.interest),
            })?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn for_report(amount: Decimal) -> Decimal {
    amount.round_dp(2).normalize()
}
