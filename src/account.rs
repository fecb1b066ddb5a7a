use crate::engine::projection::{compute_balance, compute_summary};
use crate::error::LedgerError;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    owner: String,
    username: String,
    pin: u32,
    movements: Vec<Decimal>,
    interest_rate: Decimal,
}

impl Account {
    /// Creates an account and derives its username from the owner's initials.
    ///
    /// `interest_rate` is a percentage, so `1.2` means 1.2% per deposit.
    pub fn new(
        owner: &str,
        movements: Vec<Decimal>,
        interest_rate: Decimal,
        pin: u32,
    ) -> Result<Self, LedgerError> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(LedgerError::InvalidInput {
                message: "Owner must not be empty".to_string(),
            });
        }

        if pin == 0 {
            return Err(LedgerError::InvalidInput {
                message: format!("Pin for {} must be a positive integer", owner),
            });
        }

        let account = Self {
            owner: owner.to_string(),
            username: username_for(owner),
            pin,
            movements,
            interest_rate,
        };

        // every later view is derived from these totals
        compute_balance(&account)?;
        compute_summary(&account)?;

        Ok(account)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }

    pub fn movements(&self) -> &[Decimal] {
        &self.movements
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    /// First token of the owner name, used for the welcome label.
    pub fn first_name(&self) -> &str {
        self.owner.split_whitespace().next().unwrap_or_default()
    }

    pub fn verify_pin(&self, pin: u32) -> bool {
        self.pin == pin
    }

    pub fn record_movement(&mut self, amount: Decimal) {
        self.movements.push(amount);
    }
}

/// Lowercase initials of each whitespace separated token, e.g. "Sarah Smith" -> "ss".
pub fn username_for(owner: &str) -> String {
    owner
        .split_whitespace()
        .filter_map(|name| name.chars().next())
        .flat_map(char::to_lowercase)
        .collect()
}
