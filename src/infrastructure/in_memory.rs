use crate::domain::expense::Expense;
use crate::domain::ports::ExpenseStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory expense store.
///
/// Uses `Arc<RwLock<HashMap<u64, Expense>>>` so clones share the same data.
/// Snapshots are taken under a single read guard, so writers are excluded for
/// the duration of the copy.
#[derive(Default, Clone)]
pub struct InMemoryExpenseStore {
    expenses: Arc<RwLock<HashMap<u64, Expense>>>,
}

impl InMemoryExpenseStore {
    /// Creates a new, empty in-memory expense store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseStore for InMemoryExpenseStore {
    async fn insert(&self, expense: Expense) -> Result<()> {
        let mut expenses = self.expenses.write().await;
        match expenses.entry(expense.id) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateExpense(expense.id)),
            Entry::Vacant(slot) => {
                slot.insert(expense);
                Ok(())
            }
        }
    }

    async fn remove(&self, id: u64) -> Result<Expense> {
        let mut expenses = self.expenses.write().await;
        expenses.remove(&id).ok_or(LedgerError::ExpenseNotFound(id))
    }

    async fn get(&self, id: u64) -> Result<Option<Expense>> {
        let expenses = self.expenses.read().await;
        Ok(expenses.get(&id).cloned())
    }

    async fn snapshot(&self) -> Result<Vec<Expense>> {
        let expenses = self.expenses.read().await;
        let mut snapshot: Vec<Expense> = expenses.values().cloned().collect();
        drop(expenses);

        snapshot.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(snapshot)
    }
}
