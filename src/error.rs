use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),

    #[error("Amount overflow in {0}")]
    Overflow(&'static str),
}

/// Why the session refused to apply a business operation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("recipient not found")]
    RecipientNotFound,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("cannot transfer to the same account")]
    SelfTransfer,

    #[error("no deposit of at least 10% of the requested loan")]
    LoanNotEligible,

    #[error("credentials do not match the current account")]
    CredentialMismatch,

    #[error("amount would overflow the account totals")]
    AmountOverflow,
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Wrong username or pin")]
    Auth,

    #[error("No account is logged in")]
    NotLoggedIn,

    #[error("Rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
