use crate::domain::balance::{BalanceCalculator, Balances};
use crate::domain::expense::Expense;
use crate::domain::participant::Roster;
use crate::domain::ports::ExpenseStoreBox;
use crate::domain::settlement::{SettlementEngine, SettlementPlan};
use crate::error::{LedgerError, Result};

/// The main entry point for recording expenses and evaluating the group.
///
/// `ExpenseLedger` owns the roster and the storage backend. Every evaluation
/// takes a fresh snapshot from the store and recomputes from scratch, so
/// results never go stale after an insert or removal.
pub struct ExpenseLedger {
    roster: Roster,
    store: ExpenseStoreBox,
    calculator: BalanceCalculator,
    engine: SettlementEngine,
}

impl ExpenseLedger {
    /// Creates a new `ExpenseLedger`.
    ///
    /// # Arguments
    ///
    /// * `roster` - The participants expenses may refer to.
    /// * `store` - Where expenses are kept.
    /// * `engine` - Settlement engine carrying the configured tolerance.
    pub fn new(roster: Roster, store: ExpenseStoreBox, engine: SettlementEngine) -> Self {
        Self {
            roster,
            store,
            calculator: BalanceCalculator,
            engine,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Records an expense after checking every participant is on the roster.
    pub async fn record(&self, expense: Expense) -> Result<()> {
        if let Some(stranger) = expense.participants().find(|p| !self.roster.contains(p)) {
            return Err(LedgerError::Validation(format!(
                "Expense {} refers to unknown participant '{}'",
                expense.id, stranger
            )));
        }

        let id = expense.id;
        self.store.insert(expense).await?;
        tracing::info!(expense = id, "recorded expense");
        Ok(())
    }

    /// Removes an expense. Edits are modelled as a removal plus a new record.
    pub async fn remove(&self, id: u64) -> Result<Expense> {
        let expense = self.store.remove(id).await?;
        tracing::info!(expense = id, "removed expense");
        Ok(expense)
    }

    /// Current balances over a consistent snapshot of the store.
    pub async fn balances(&self) -> Result<Balances> {
        let snapshot = self.store.snapshot().await?;
        Ok(self.calculator.compute(&self.roster, &snapshot))
    }

    /// Payments that would settle the current balances.
    pub async fn settlement(&self) -> Result<SettlementPlan> {
        let balances = self.balances().await?;
        Ok(self.engine.plan(&balances))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::Amount;
    use crate::domain::participant::Participant;
    use crate::domain::settlement::SettlementTransaction;
    use crate::infrastructure::in_memory::InMemoryExpenseStore;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ledger() -> ExpenseLedger {
        ExpenseLedger::new(
            Roster::new(["A", "B", "C"]).unwrap(),
            Box::new(InMemoryExpenseStore::new()),
            SettlementEngine::default(),
        )
    }

    fn expense(id: u64, amount: Decimal, payer: &str, involved: &[&str]) -> Expense {
        Expense::new(
            id,
            Amount::new(amount).unwrap(),
            "test",
            Participant::from(payer),
            involved.iter().map(|p| Participant::from(*p)),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_record_and_settle() {
        let ledger = ledger();
        ledger
            .record(expense(1, dec!(30), "A", &["A", "B", "C"]))
            .await
            .unwrap();

        let balances = ledger.balances().await.unwrap();
        assert_eq!(balances.get(&Participant::from("A")), Some(dec!(20)));

        let plan = ledger.settlement().await.unwrap();
        assert_eq!(
            plan.transactions,
            vec![
                SettlementTransaction {
                    from: Participant::from("B"),
                    to: Participant::from("A"),
                    amount: dec!(10.00),
                },
                SettlementTransaction {
                    from: Participant::from("C"),
                    to: Participant::from("A"),
                    amount: dec!(10.00),
                },
            ]
        );
        assert!(plan.unsettled.is_empty());
    }

    #[tokio::test]
    async fn test_record_rejects_unknown_participant() {
        let ledger = ledger();
        let result = ledger.record(expense(1, dec!(10), "A", &["Z"])).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));

        let result = ledger.record(expense(2, dec!(10), "Z", &["A"])).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_remove_recomputes_from_scratch() {
        let ledger = ledger();
        ledger
            .record(expense(1, dec!(30), "A", &["A", "B", "C"]))
            .await
            .unwrap();
        ledger
            .record(expense(2, dec!(9), "B", &["C"]))
            .await
            .unwrap();

        ledger.remove(1).await.unwrap();

        let balances = ledger.balances().await.unwrap();
        assert_eq!(balances.get(&Participant::from("A")), Some(Decimal::ZERO));
        assert_eq!(balances.get(&Participant::from("B")), Some(dec!(9)));
        assert_eq!(balances.get(&Participant::from("C")), Some(dec!(-9)));
    }

    #[tokio::test]
    async fn test_edit_as_remove_and_record() {
        let ledger = ledger();
        ledger
            .record(expense(1, dec!(30), "A", &["B"]))
            .await
            .unwrap();

        let mut edited = ledger.remove(1).await.unwrap();
        edited.amount = Amount::new(dec!(12)).unwrap();
        ledger.record(edited).await.unwrap();

        let balances = ledger.balances().await.unwrap();
        assert_eq!(balances.get(&Participant::from("B")), Some(dec!(-12)));
    }

    #[tokio::test]
    async fn test_duplicate_id_surfaces_store_error() {
        let ledger = ledger();
        ledger
            .record(expense(1, dec!(5), "A", &["B"]))
            .await
            .unwrap();
        let result = ledger.record(expense(1, dec!(6), "A", &["C"])).await;
        assert!(matches!(result, Err(LedgerError::DuplicateExpense(1))));
    }
}
