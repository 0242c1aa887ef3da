use super::participant::Participant;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A strictly positive monetary amount.
///
/// Wraps `rust_decimal::Decimal` so that an `Expense` can never carry a zero
/// or negative amount once constructed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::Validation(format!(
                "Amount must be positive, got {}",
                value
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A single shared expense: `payer` paid `amount` on behalf of `involved`.
///
/// Expenses are immutable once recorded; an edit is a removal followed by a
/// new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: u64,
    pub amount: Amount,
    pub description: String,
    pub payer: Participant,
    /// Participants the expense is split between. May include the payer.
    pub involved: Vec<Participant>,
    pub timestamp: DateTime<Utc>,
}

impl Expense {
    /// Creates an expense, collapsing repeated names in `involved`.
    pub fn new(
        id: u64,
        amount: Amount,
        description: impl Into<String>,
        payer: Participant,
        involved: impl IntoIterator<Item = Participant>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut unique: Vec<Participant> = Vec::new();
        for participant in involved {
            if !unique.contains(&participant) {
                unique.push(participant);
            }
        }

        Self {
            id,
            amount,
            description: description.into(),
            payer,
            involved: unique,
            timestamp,
        }
    }

    /// Participants this expense touches, payer first.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        std::iter::once(&self.payer).chain(self.involved.iter())
    }
}
