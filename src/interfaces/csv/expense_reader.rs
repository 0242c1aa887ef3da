use crate::domain::expense::{Amount, Expense};
use crate::domain::participant::Participant;
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// Separator between names in the `involved` column.
pub const INVOLVED_SEPARATOR: char = ';';

/// One row of an expense CSV, before validation.
#[derive(Debug, Deserialize)]
struct ExpenseRecord {
    id: u64,
    amount: Decimal,
    #[serde(default)]
    description: String,
    payer: String,
    #[serde(default)]
    involved: String,
    timestamp: DateTime<Utc>,
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = LedgerError;

    fn try_from(record: ExpenseRecord) -> Result<Self> {
        let involved = record
            .involved
            .split(INVOLVED_SEPARATOR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Participant::from);

        Ok(Expense::new(
            record.id,
            Amount::new(record.amount)?,
            record.description,
            Participant::new(record.payer),
            involved,
            record.timestamp,
        ))
    }
}

/// Reads expenses from a CSV source.
///
/// Expected header: `id,amount,description,payer,involved,timestamp`, where
/// `involved` is a `;`-separated list and `timestamp` is RFC 3339. Whitespace
/// around fields is trimmed.
pub struct ExpenseReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ExpenseReader<R> {
    /// Creates a new `ExpenseReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes and validates each row.
    ///
    /// A bad row yields an `Err` item and does not stop the iterator.
    pub fn expenses(self) -> impl Iterator<Item = Result<Expense>> {
        self.reader.into_deserialize().map(|result| {
            let record: ExpenseRecord = result?;
            Expense::try_from(record)
        })
    }
}
