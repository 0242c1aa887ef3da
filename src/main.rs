use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use splitledger::application::ledger::ExpenseLedger;
use splitledger::config::GroupConfig;
use splitledger::domain::ports::{ExpenseStore, ExpenseStoreBox};
use splitledger::domain::settlement::SettlementEngine;
use splitledger::error::LedgerError;
use splitledger::infrastructure::in_memory::InMemoryExpenseStore;
use splitledger::interfaces::csv::expense_reader::ExpenseReader;
use splitledger::interfaces::csv::report_writer::ReportWriter;
use splitledger::logging::{LogFormat, init_logging};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Group configuration file (TOML) declaring the roster and settlement policy
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated roster, overriding the one in the config file
    #[arg(long, value_delimiter = ',')]
    roster: Option<Vec<String>>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import expenses (optional) and print every participant's balance
    Balances {
        /// Expenses CSV file
        input: Option<PathBuf>,
    },
    /// Import expenses (optional) and print the payments that settle the group
    Settle {
        /// Expenses CSV file
        input: Option<PathBuf>,
    },
    /// Delete an expense from the persistent store (needs --db-path, no roster)
    Remove {
        /// Expense id
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    let mut config = match &cli.config {
        Some(path) => GroupConfig::from_file(path).into_diagnostic()?,
        None => GroupConfig::default(),
    };
    if let Some(roster) = cli.roster {
        config = config.with_roster(roster);
    }

    let (store, persistent) = open_store(cli.db_path.as_deref())?;

    match cli.command {
        Command::Balances { input } => {
            let ledger = open_ledger(config, store)?;
            if let Some(input) = input {
                import(&ledger, &input).await?;
            }
            let balances = ledger.balances().await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = ReportWriter::new(stdout.lock());
            writer.write_balances(&balances).into_diagnostic()?;
        }
        Command::Settle { input } => {
            let ledger = open_ledger(config, store)?;
            if let Some(input) = input {
                import(&ledger, &input).await?;
            }
            let plan = ledger.settlement().await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = ReportWriter::new(stdout.lock());
            writer
                .write_transactions(&plan.transactions)
                .into_diagnostic()?;
        }
        Command::Remove { id } => {
            if !persistent {
                return Err(LedgerError::Validation(
                    "remove needs a persistent store; pass --db-path".to_string(),
                ))
                .into_diagnostic();
            }
            // Removal does not consult the roster.
            let expense = store.remove(id).await.into_diagnostic()?;
            tracing::info!(expense = id, "removed expense");
            println!("Removed expense {}: {}", expense.id, expense.description);
        }
    }

    Ok(())
}

fn open_ledger(config: GroupConfig, store: ExpenseStoreBox) -> Result<ExpenseLedger> {
    let roster = config.roster().into_diagnostic()?;
    Ok(ExpenseLedger::new(
        roster,
        store,
        SettlementEngine::new(config.settlement),
    ))
}

/// Reads every row of `input` into the ledger, reporting bad rows and moving on.
async fn import(ledger: &ExpenseLedger, input: &Path) -> Result<()> {
    let file = File::open(input).into_diagnostic()?;
    let reader = ExpenseReader::new(file);
    for expense in reader.expenses() {
        match expense {
            Ok(expense) => {
                if let Err(e) = ledger.record(expense).await {
                    tracing::error!(error = %e, "Error recording expense");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error reading expense");
            }
        }
    }
    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<&Path>) -> Result<(ExpenseStoreBox, bool)> {
    use splitledger::infrastructure::rocksdb::RocksDbExpenseStore;

    match db_path {
        Some(path) => {
            let store = RocksDbExpenseStore::open(path).into_diagnostic()?;
            Ok((Box::new(store), true))
        }
        None => Ok((Box::new(InMemoryExpenseStore::new()), false)),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<&Path>) -> Result<(ExpenseStoreBox, bool)> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok((Box::new(InMemoryExpenseStore::new()), false))
}
