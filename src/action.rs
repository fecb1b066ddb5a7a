use crate::error::LedgerError;

use rust_decimal::Decimal;
use serde::Deserialize;

/// A UI request the session can apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login { username: String, pin: u32 },
    Transfer { to: String, amount: Decimal },
    Loan { amount: Decimal },
    Close { username: String, pin: u32 },
    Sort,
    Logout,
}

/// One row of an action script, the form fields as the UI harvested them.
#[derive(Debug, Deserialize)]
pub struct CsvAction {
    #[serde(rename = "action")]
    pub kind: ActionType,
    pub username: Option<String>,
    pub pin: Option<u32>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Login,
    Transfer,
    Loan,
    Close,
    Sort,
    Logout,
}

impl Action {
    pub fn kind(&self) -> ActionType {
        match self {
            Action::Login { .. } => ActionType::Login,
            Action::Transfer { .. } => ActionType::Transfer,
            Action::Loan { .. } => ActionType::Loan,
            Action::Close { .. } => ActionType::Close,
            Action::Sort => ActionType::Sort,
            Action::Logout => ActionType::Logout,
        }
    }
}

impl TryFrom<CsvAction> for Action {
    type Error = LedgerError;

    fn try_from(csv: CsvAction) -> Result<Self, Self::Error> {
        let kind = csv.kind;
        let username = || {
            csv.username
                .clone()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| missing(kind, "username"))
        };
        let pin = || csv.pin.ok_or_else(|| missing(kind, "pin"));
        let amount = || csv.amount.ok_or_else(|| missing(kind, "amount"));

        let action = match kind {
            ActionType::Login => Action::Login {
                username: username()?,
                pin: pin()?,
            },
            ActionType::Transfer => Action::Transfer {
                to: username()?,
                amount: amount()?,
            },
            ActionType::Loan => Action::Loan { amount: amount()? },
            ActionType::Close => Action::Close {
                username: username()?,
                pin: pin()?,
            },
            ActionType::Sort => Action::Sort,
            ActionType::Logout => Action::Logout,
        };

        Ok(action)
    }
}

fn missing(kind: ActionType, field: &str) -> LedgerError {
    LedgerError::InvalidInput {
        message: format!("Missing {} for {:?} action", field, kind),
    }
}
