use super::expense::Expense;
use super::participant::{Participant, Roster};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Net position of every participant, in roster order.
///
/// Positive values are owed money, negative values owe money. Always derived
/// from a full expense snapshot and never updated incrementally.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Balances {
    entries: Vec<(Participant, Decimal)>,
}

impl Balances {
    pub fn get(&self, participant: &Participant) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(p, _)| p == participant)
            .map(|(_, balance)| *balance)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Participant, Decimal)> {
        self.entries.iter().map(|(p, balance)| (p, *balance))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero for a consistent snapshot, up to division
    /// remainders. Saturates at the `Decimal` range.
    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, (_, balance)| acc.saturating_add(*balance))
    }

    /// Sum of the positive balances, saturating.
    pub fn total_credit(&self) -> Decimal {
        self.entries.iter().fold(Decimal::ZERO, |acc, (_, balance)| {
            acc.saturating_add((*balance).max(Decimal::ZERO))
        })
    }
}

impl FromIterator<(Participant, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (Participant, Decimal)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Reduces an expense snapshot into per-participant balances.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Computes the net balance of every roster member.
    ///
    /// Each expense credits its payer with the full amount and debits every
    /// involved participant with an equal share. Expenses with nobody
    /// involved, naming someone outside the roster, or pushing a balance past
    /// the `Decimal` range contribute nothing.
    pub fn compute(&self, roster: &Roster, expenses: &[Expense]) -> Balances {
        let mut entries: Vec<(Participant, Decimal)> = roster
            .iter()
            .map(|p| (p.clone(), Decimal::ZERO))
            .collect();
        let index: HashMap<Participant, usize> = roster
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();

        for expense in expenses {
            if expense.involved.is_empty() {
                tracing::warn!(expense = expense.id, "skipping expense with nobody involved");
                continue;
            }
            if let Some(stranger) = expense.participants().find(|p| !index.contains_key(*p)) {
                tracing::warn!(
                    expense = expense.id,
                    participant = %stranger,
                    "skipping expense naming a participant outside the roster"
                );
                continue;
            }

            match Self::apply(&entries, &index, expense) {
                Some(updates) => {
                    for (slot, balance) in updates {
                        entries[slot].1 = balance;
                    }
                }
                None => {
                    tracing::warn!(
                        expense = expense.id,
                        amount = %expense.amount.value(),
                        "skipping expense that overflows a balance"
                    );
                }
            }
        }

        let balances = Balances { entries };
        tracing::debug!(
            expenses = expenses.len(),
            participants = balances.len(),
            total = %balances.total(),
            "computed balances"
        );
        balances
    }

    /// New balances of every participant `expense` touches, or `None` if one
    /// of them would overflow. Nothing is written until all of them fit.
    fn apply(
        entries: &[(Participant, Decimal)],
        index: &HashMap<Participant, usize>,
        expense: &Expense,
    ) -> Option<Vec<(usize, Decimal)>> {
        let amount = expense.amount.value();
        let share = amount.checked_div(Decimal::from(expense.involved.len()))?;

        let payer = index[&expense.payer];
        let mut updates = Vec::with_capacity(expense.involved.len() + 1);
        updates.push((payer, entries[payer].1.checked_add(amount)?));

        for participant in &expense.involved {
            let slot = index[participant];
            match updates.iter_mut().find(|(s, _)| *s == slot) {
                Some((_, balance)) => *balance = balance.checked_sub(share)?,
                None => updates.push((slot, entries[slot].1.checked_sub(share)?)),
            }
        }
        Some(updates)
    }
}
