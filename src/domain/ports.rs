use super::expense::Expense;
use crate::error::Result;
use async_trait::async_trait;

/// Storage for recorded expenses.
///
/// Implementations must hand out snapshots that are consistent: a snapshot
/// never observes half of a concurrent insert or removal.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Stores a new expense. Fails with `DuplicateExpense` if the id is taken.
    async fn insert(&self, expense: Expense) -> Result<()>;
    /// Deletes an expense and returns it. Fails with `ExpenseNotFound`.
    async fn remove(&self, id: u64) -> Result<Expense>;
    async fn get(&self, id: u64) -> Result<Option<Expense>>;
    /// Every stored expense, ordered by timestamp then id.
    async fn snapshot(&self) -> Result<Vec<Expense>>;
}

pub type ExpenseStoreBox = Box<dyn ExpenseStore>;
