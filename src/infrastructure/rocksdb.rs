use crate::domain::expense::Expense;
use crate::domain::ports::ExpenseStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family holding expense records.
pub const CF_EXPENSES: &str = "expenses";

/// A persistent expense store backed by RocksDB.
///
/// Expenses live in the `expenses` column family, keyed by the big-endian id
/// and encoded as JSON. Snapshots read from a RocksDB snapshot so they see a
/// single point in time even while other handles write.
///
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbExpenseStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbExpenseStore {
    /// Opens or creates a RocksDB instance at `path` with the expenses column
    /// family.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_expenses = ColumnFamilyDescriptor::new(CF_EXPENSES, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_expenses])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn expenses_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_EXPENSES).ok_or_else(|| {
            LedgerError::Internal(Box::new(std::io::Error::other(
                "Expenses column family not found",
            )))
        })
    }
}

#[async_trait]
impl ExpenseStore for RocksDbExpenseStore {
    async fn insert(&self, expense: Expense) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let cf = self.expenses_cf()?;
        let key = expense.id.to_be_bytes();

        if self.db.get_pinned_cf(cf, key)?.is_some() {
            return Err(LedgerError::DuplicateExpense(expense.id));
        }

        let value = serde_json::to_vec(&expense)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    async fn remove(&self, id: u64) -> Result<Expense> {
        let _guard = self.write_lock.lock().await;
        let cf = self.expenses_cf()?;
        let key = id.to_be_bytes();

        let bytes = self
            .db
            .get_cf(cf, key)?
            .ok_or(LedgerError::ExpenseNotFound(id))?;
        let expense: Expense = serde_json::from_slice(&bytes)?;
        self.db.delete_cf(cf, key)?;
        Ok(expense)
    }

    async fn get(&self, id: u64) -> Result<Option<Expense>> {
        let cf = self.expenses_cf()?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn snapshot(&self) -> Result<Vec<Expense>> {
        let cf = self.expenses_cf()?;
        let snapshot = self.db.snapshot();

        let mut expenses = Vec::new();
        for item in snapshot.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            expenses.push(serde_json::from_slice::<Expense>(&value)?);
        }

        expenses.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(expenses)
    }
}
