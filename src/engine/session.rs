use crate::account::Account;
use crate::action::Action;
use crate::engine::ledger::Ledger;
use crate::engine::projection::{account_view, admits_movement, compute_balance, AccountView};
use crate::error::{Rejection, SessionError};

use rust_decimal::Decimal;

/// Fraction of a requested loan that some earlier movement has to reach.
const LOAN_DEPOSIT_RATIO: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState<'a> {
    LoggedOut,
    LoggedIn(&'a Account),
}

/// The single mutator of a [`Ledger`]: tracks who is logged in and applies
/// their requests.
///
/// Every operation either applies completely or returns an error and leaves
/// the ledger and the session as they were.
pub struct Session {
    ledger: Ledger,
    current: Option<String>,
    sorted: bool,
}

impl Session {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            current: None,
            sorted: false,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    pub fn state(&self) -> SessionState<'_> {
        match self.current_account() {
            Some(account) => SessionState::LoggedIn(account),
            None => SessionState::LoggedOut,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_account().is_some()
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.current
            .as_deref()
            .and_then(|username| self.ledger.find_by_username(username))
    }

    pub fn sorted(&self) -> bool {
        self.sorted
    }

    pub fn login(&mut self, username: &str, pin: u32) -> Result<&Account, SessionError> {
        match self.ledger.find_by_username(username) {
            Some(account) if account.verify_pin(pin) => {}
            _ => return Err(SessionError::Auth),
        }

        self.current = Some(username.to_string());
        self.sorted = false;

        self.current_account().ok_or(SessionError::Auth)
    }

    pub fn logout(&mut self) {
        self.current = None;
        self.sorted = false;
    }

    pub fn transfer(&mut self, to: &str, amount: Decimal) -> Result<(), SessionError> {
        let current = self.current_account().ok_or(SessionError::NotLoggedIn)?;

        if amount <= Decimal::ZERO {
            return Err(Rejection::NonPositiveAmount.into());
        }

        let recipient = self
            .ledger
            .find_by_username(to)
            .ok_or(Rejection::RecipientNotFound)?;

        if amount > compute_balance(current)? {
            return Err(Rejection::InsufficientFunds.into());
        }

        if recipient.username() == current.username() {
            return Err(Rejection::SelfTransfer.into());
        }

        if !admits_movement(recipient, amount) || !admits_movement(current, -amount) {
            return Err(Rejection::AmountOverflow.into());
        }

        let from = current.username().to_string();
        self.ledger.transfer(&from, to, amount)?;
        Ok(())
    }

    /// Grants a loan when any movement reaches 10% of the requested amount.
    pub fn request_loan(&mut self, amount: Decimal) -> Result<(), SessionError> {
        let username = self.current_username()?;

        if amount <= Decimal::ZERO {
            return Err(Rejection::NonPositiveAmount.into());
        }

        let account = self
            .ledger
            .find_by_username_mut(&username)
            .ok_or(SessionError::NotLoggedIn)?;

        let threshold = amount * LOAN_DEPOSIT_RATIO;
        if !account.movements().iter().any(|m| *m >= threshold) {
            return Err(Rejection::LoanNotEligible.into());
        }

        if !admits_movement(account, amount) {
            return Err(Rejection::AmountOverflow.into());
        }

        account.record_movement(amount);
        Ok(())
    }

    /// Closes the logged in account. Credentials of any other account are
    /// refused even when they are valid.
    pub fn close_account(&mut self, username: &str, pin: u32) -> Result<Account, SessionError> {
        let current = self.current_account().ok_or(SessionError::NotLoggedIn)?;

        if current.username() != username || !current.verify_pin(pin) {
            return Err(Rejection::CredentialMismatch.into());
        }

        let closed = self.ledger.remove_account(username)?;
        self.logout();

        Ok(closed)
    }

    pub fn toggle_sort(&mut self) -> Result<bool, SessionError> {
        if !self.is_logged_in() {
            return Err(SessionError::NotLoggedIn);
        }

        self.sorted = !self.sorted;
        Ok(self.sorted)
    }

    /// What the UI shows for the logged in account.
    pub fn view(&self) -> Result<AccountView, SessionError> {
        let account = self.current_account().ok_or(SessionError::NotLoggedIn)?;
        Ok(account_view(account, self.sorted)?)
    }

    pub fn apply(&mut self, action: Action) -> Result<(), SessionError> {
        match action {
            Action::Login { username, pin } => self.login(&username, pin).map(|_| ()),
            Action::Transfer { to, amount } => self.transfer(&to, amount),
            Action::Loan { amount } => self.request_loan(amount),
            Action::Close { username, pin } => self.close_account(&username, pin).map(|_| ()),
            Action::Sort => self.toggle_sort().map(|_| ()),
            Action::Logout => {
                self.logout();
                Ok(())
            }
        }
    }

    fn current_username(&self) -> Result<String, SessionError> {
        self.current_account()
            .map(|account| account.username().to_string())
            .ok_or(SessionError::NotLoggedIn)
    }
}
