pub mod ledger;
pub mod projection;
pub mod session;
