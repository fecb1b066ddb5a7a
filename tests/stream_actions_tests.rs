use bankist::account::Account;
use bankist::action::{Action, ActionType};
use bankist::engine::ledger::Ledger;
use bankist::engine::projection::compute_balance;
use bankist::engine::session::Session;
use bankist::error::{Rejection, SessionError};
use bankist::{load_accounts, stream_actions};
use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;
use tempfile::NamedTempFile;

#[test]
fn test_stream_actions_valid_csv() {
    let temp_file = NamedTempFile::new().unwrap();
    let csv_content = r#"action,username,pin,amount
login,js,1111,
transfer,jd,,100.50
loan,,,1000
sort,,,
close,js,1111,
logout,,,"#;

    fs::write(&temp_file, csv_content).unwrap();

    let rows: Vec<_> = stream_actions(temp_file.path()).unwrap().collect();

    assert_eq!(rows.len(), 6);

    let login = rows[0].as_ref().unwrap();
    assert_eq!(login.kind, ActionType::Login);
    assert_eq!(login.username.as_deref(), Some("js"));
    assert_eq!(login.pin, Some(1111));
    assert_eq!(login.amount, None);

    let transfer = rows[1].as_ref().unwrap();
    assert_eq!(transfer.kind, ActionType::Transfer);
    assert_eq!(transfer.pin, None);
    assert_eq!(transfer.amount, Some(Decimal::from_str("100.50").unwrap()));
}

#[test]
fn test_stream_actions_short_rows() {
    let temp_file = NamedTempFile::new().unwrap();
    let csv_content = "action,username,pin,amount\nsort\nlogout\n";

    fs::write(&temp_file, csv_content).unwrap();

    let rows: Vec<_> = stream_actions(temp_file.path()).unwrap().collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].as_ref().unwrap().kind, ActionType::Sort);
    assert_eq!(rows[1].as_ref().unwrap().username, None);
}

#[test]
fn test_stream_actions_empty_csv() {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(&temp_file, "action,username,pin,amount").unwrap();

    let rows: Vec<_> = stream_actions(temp_file.path()).unwrap().collect();

    assert_eq!(rows.len(), 0);
}

#[test]
fn test_stream_actions_bad_rows_do_not_stop_stream() {
    let temp_file = NamedTempFile::new().unwrap();
    let csv_content = r#"action,username,pin,amount
withdraw,js,,10
login,js,abc,
login,js,1111,"#;

    fs::write(&temp_file, csv_content).unwrap();

    let rows: Vec<_> = stream_actions(temp_file.path()).unwrap().collect();

    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_err());
    assert!(rows[1].is_err());
    assert!(rows[2].is_ok());
}

#[test]
fn test_stream_actions_invalid_file() {
    assert!(stream_actions("nonexistent_file.csv").is_err());
}

#[test]
fn test_replay_script_against_seed_ledger() {
    let temp_file = NamedTempFile::new().unwrap();
    let csv_content = r#"action,username,pin,amount
login,jd,2222,
transfer,js,,720
transfer,js,,999999
loan,,,5000
close,jd,1111,
logout,,,
login,js,1111,
close,js,1111,"#;

    fs::write(&temp_file, csv_content).unwrap();

    let mut session = Session::new(Ledger::seed().unwrap());
    let mut refused = 0;
    for row in stream_actions(temp_file.path()).unwrap() {
        let action = Action::try_from(row.unwrap()).unwrap();
        if session.apply(action).is_err() {
            refused += 1;
        }
    }

    // the oversized transfer and the close with the wrong pin
    assert_eq!(refused, 2);
    assert!(!session.is_logged_in());

    let ledger = session.ledger();
    assert_eq!(ledger.len(), 3);
    assert!(ledger.find_by_username("js").is_none());

    let jessica = ledger.find_by_username("jd").unwrap();
    assert_eq!(compute_balance(jessica).unwrap(), Decimal::from(11720 - 720 + 5000));
}

#[test]
fn test_load_accounts() {
    let temp_file = NamedTempFile::new().unwrap();
    let csv_content = r#"owner,pin,interest_rate,movements
Alice Adams,1234,1.2,100 -40 12.5
Bob Brown,5678,0.7,"#;

    fs::write(&temp_file, csv_content).unwrap();

    let ledger = load_accounts(temp_file.path()).unwrap();

    assert_eq!(ledger.len(), 2);

    let alice = ledger.find_by_username("aa").unwrap();
    assert_eq!(alice.pin(), 1234);
    assert_eq!(alice.interest_rate(), Decimal::from_str("1.2").unwrap());
    assert_eq!(compute_balance(alice).unwrap(), Decimal::from_str("72.5").unwrap());

    let bob = ledger.find_by_username("bb").unwrap();
    assert!(bob.movements().is_empty());
}

#[test]
fn test_load_accounts_duplicate_username() {
    let temp_file = NamedTempFile::new().unwrap();
    let csv_content = r#"owner,pin,interest_rate,movements
Sarah Smith,4444,1,430
Sam Stone,5555,1,10"#;

    fs::write(&temp_file, csv_content).unwrap();

    assert!(load_accounts(temp_file.path()).is_err());
}

#[test]
fn test_load_accounts_bad_movement() {
    let temp_file = NamedTempFile::new().unwrap();
    let csv_content = r#"owner,pin,interest_rate,movements
Sarah Smith,4444,1,430 abc"#;

    fs::write(&temp_file, csv_content).unwrap();

    let err = load_accounts(temp_file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid movement 'abc'"));
}

#[test]
fn test_load_accounts_zero_pin() {
    let temp_file = NamedTempFile::new().unwrap();
    let csv_content = r#"owner,pin,interest_rate,movements
Sarah Smith,0,1,430"#;

    fs::write(&temp_file, csv_content).unwrap();

    assert!(load_accounts(temp_file.path()).is_err());
}

#[test]
fn test_load_accounts_overflowing_movements() {
    let temp_file = NamedTempFile::new().unwrap();
    let csv_content = format!(
        "owner,pin,interest_rate,movements\nSarah Smith,4444,1,{} 1\n",
        Decimal::MAX
    );

    fs::write(&temp_file, csv_content).unwrap();

    let err = load_accounts(temp_file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Amount overflow in balance"));
}

#[test]
fn test_overflowing_loan_keeps_report_writable() {
    let half = Decimal::MAX / Decimal::TWO;
    let carol = Account::new("Carol Clark", vec![half], Decimal::ZERO, 3333).unwrap();
    let mut session = Session::new(Ledger::from_accounts([carol]).unwrap());

    let login = Action::Login {
        username: "cc".to_string(),
        pin: 3333,
    };
    assert!(session.apply(login).is_ok());
    assert_eq!(
        session.apply(Action::Loan {
            amount: Decimal::MAX
        }),
        Err(SessionError::Rejected(Rejection::AmountOverflow))
    );

    let mut buf = Vec::new();
    session.ledger().dump_accounts(&mut buf).unwrap();
    let output = String::from_utf8(buf).unwrap();
    assert!(output.contains(&format!("cc,Carol Clark,{},{},0,0", half, half)));
}
