use bankist::{
    action::{Action, ActionType},
    engine::{ledger::Ledger, session::Session},
    error::SessionError,
    load_accounts, stream_actions,
};

use anyhow::{bail, Context};
use clap::Parser;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bankist")]
#[command(about = "Replay Bankist UI actions against the demo ledger", long_about = None)]
struct Cli {
    /// Action script: action,username,pin,amount
    #[arg(default_value = "actions.csv")]
    actions: PathBuf,

    /// Seed accounts file: owner,pin,interest_rate,movements
    #[arg(long)]
    accounts: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    validate_csv_file(&cli.actions)?;

    let ledger = match &cli.accounts {
        Some(path) => {
            validate_csv_file(path)?;
            load_accounts(path)?
        }
        None => Ledger::seed()?,
    };
    info!(accounts = ledger.len(), total = %ledger.total_balance()?, "Ledger ready");

    process_actions(&cli.actions, ledger).await
}

fn validate_csv_file(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("File '{}' does not exist", path.display());
    }

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!("File '{}' is not a CSV file", path.display());
    }

    Ok(())
}

async fn process_actions(path: &Path, ledger: Ledger) -> anyhow::Result<()> {
    info!(path = %path.display(), "Processing actions");
    let rows = stream_actions(path)
        .with_context(|| format!("Failed to open action script {}", path.display()))?;

    // The session task is the only owner of the ledger
    let (tx_channel, mut rx) = mpsc::channel::<Action>(100);

    let session_task = tokio::spawn(async move {
        let mut session = Session::new(ledger);

        while let Some(action) = rx.recv().await {
            let kind = action.kind();
            match session.apply(action) {
                Ok(()) => {
                    debug!(action = ?kind, "Action applied");
                    if kind == ActionType::Login {
                        if let Some(account) = session.current_account() {
                            info!("Welcome back, {}!", account.first_name());
                        }
                    }
                    render(&session);
                }
                Err(e) => warn!(action = ?kind, error = %e, "Action refused"),
            }
        }

        session
    });

    for row in rows {
        match row {
            Ok(csv_action) => match Action::try_from(csv_action) {
                Ok(action) => {
                    if tx_channel.send(action).await.is_err() {
                        bail!("Session task stopped early");
                    }
                }
                Err(e) => warn!(error = %e, "Skipping invalid action"),
            },
            Err(e) => warn!(error = %e, "Skipping unreadable CSV line"),
        }
    }
    drop(tx_channel);

    let session = session_task.await.context("Session task panicked")?;
    let ledger = session.into_ledger();
    info!(accounts = ledger.len(), total = %ledger.total_balance()?, "Run finished");

    let mut out = stdout().lock();
    ledger.dump_accounts(&mut out)?;
    out.flush()?;

    Ok(())
}

/// Account views go to the log so stdout carries only the CSV report.
fn render(session: &Session) {
    match session.view() {
        Ok(view) => info!("{}", view.to_string().trim_end()),
        Err(SessionError::NotLoggedIn) => {}
        Err(e) => warn!(error = %e, "Failed to build account view"),
    }
}
