use crate::domain::balance::Balances;
use crate::domain::settlement::{SettlementTransaction, round_cents};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRow<'a> {
    participant: &'a str,
    balance: Decimal,
}

#[derive(Serialize)]
struct TransactionRow<'a> {
    from: &'a str,
    to: &'a str,
    amount: Decimal,
}

/// Writes balances and settlement transactions as CSV.
///
/// Monetary values are written with exactly two decimal places. The header
/// is always written, even for an empty report.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    /// One `participant,balance` row per participant, in roster order.
    pub fn write_balances(&mut self, balances: &Balances) -> Result<()> {
        self.writer.write_record(["participant", "balance"])?;
        for (participant, balance) in balances.iter() {
            self.writer.serialize(BalanceRow {
                participant: participant.name(),
                balance: round_cents(balance),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// One `from,to,amount` row per transaction, in settlement order.
    pub fn write_transactions(&mut self, transactions: &[SettlementTransaction]) -> Result<()> {
        self.writer.write_record(["from", "to", "amount"])?;
        for tx in transactions {
            self.writer.serialize(TransactionRow {
                from: tx.from.name(),
                to: tx.to.name(),
                amount: round_cents(tx.amount),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
