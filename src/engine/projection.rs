//! Display values derived from an account. Nothing here mutates state.

use crate::account::Account;
use crate::error::LedgerError;

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Deposit,
    Withdrawal,
}

impl MovementType {
    pub fn of(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            MovementType::Deposit
        } else {
            MovementType::Withdrawal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Deposit => "deposit",
            MovementType::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the movements list as it is shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementRow {
    /// 1-based position in the displayed list, after any sorting.
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: MovementType,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub interest: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountView {
    pub owner: String,
    pub username: String,
    pub balance: Decimal,
    pub summary: Summary,
    pub movements: Vec<MovementRow>,
}

pub fn display_movements(account: &Account, sorted: bool) -> Vec<MovementRow> {
    let mut amounts = account.movements().to_vec();
    if sorted {
        // stable, equal amounts keep their append order
        amounts.sort();
    }

    amounts
        .into_iter()
        .enumerate()
        .map(|(i, amount)| MovementRow {
            index: i + 1,
            kind: MovementType::of(amount),
            amount,
        })
        .collect()
}

pub fn compute_balance(account: &Account) -> Result<Decimal, LedgerError> {
    checked_sum(account.movements().iter().copied(), "balance")
}

/// Income, expenses and interest totals.
///
/// Interest is paid per deposit at the account rate, and a deposit whose
/// interest comes to less than 1 earns nothing.
pub fn compute_summary(account: &Account) -> Result<Summary, LedgerError> {
    summarize(account.movements(), account.interest_rate())
}

/// Whether appending `amount` keeps every total of the account representable.
pub fn admits_movement(account: &Account, amount: Decimal) -> bool {
    let mut movements = account.movements().to_vec();
    movements.push(amount);

    checked_sum(movements.iter().copied(), "balance").is_ok()
        && summarize(&movements, account.interest_rate()).is_ok()
}

pub fn account_view(account: &Account, sorted: bool) -> Result<AccountView, LedgerError> {
    Ok(AccountView {
        owner: account.owner().to_string(),
        username: account.username().to_string(),
        balance: compute_balance(account)?,
        summary: compute_summary(account)?,
        movements: display_movements(account, sorted),
    })
}

fn summarize(movements: &[Decimal], interest_rate: Decimal) -> Result<Summary, LedgerError> {
    let deposits = || movements.iter().copied().filter(|m| *m > Decimal::ZERO);

    let income = checked_sum(deposits(), "income")?;

    let expenses = checked_sum(
        movements.iter().copied().filter(|m| *m < Decimal::ZERO),
        "expenses",
    )?;

    let interest = deposits().try_fold(
        Decimal::ZERO,
        |total, deposit| -> Result<Decimal, LedgerError> {
            let interest = deposit
                .checked_mul(interest_rate)
                .ok_or(LedgerError::Overflow("interest"))?
                / Decimal::ONE_HUNDRED;
            if interest < Decimal::ONE {
                return Ok(total);
            }
            total
                .checked_add(interest)
                .ok_or(LedgerError::Overflow("interest"))
        },
    )?;

    Ok(Summary {
        income,
        expenses: expenses.abs(),
        interest,
    })
}

fn checked_sum<I>(amounts: I, total: &'static str) -> Result<Decimal, LedgerError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |sum, amount| {
        sum.checked_add(amount).ok_or(LedgerError::Overflow(total))
    })
}

impl fmt::Display for AccountView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}) balance={} in={} out={} interest={}",
            self.owner,
            self.username,
            self.balance,
            self.summary.income,
            self.summary.expenses,
            self.summary.interest.round_dp(2)
        )?;

        for row in &self.movements {
            writeln!(f, "  {:>3} {:<10} {}", row.index, row.kind, row.amount)?;
        }

        Ok(())
    }
}
