//! Ledger repository for CSV storage
//!
//! The ledger is one flat table, `Date,Amount,Category`, in append order.
//! Reads always load the whole table; edits always rewrite the whole table.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction};

use super::file_io::{append_csv_record, read_csv, write_csv_atomic};

/// Column order of the persisted table
pub const LEDGER_HEADER: [&str; 3] = ["Date", "Amount", "Category"];

/// Changes to apply to a single row; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowEdit {
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub category: Option<String>,
}

impl RowEdit {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.amount.is_none() && self.category.is_none()
    }
}

/// Repository for the persisted expense table
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Create a store backed by the given CSV path; nothing is touched on disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a persisted table exists yet
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load every row in file order
    ///
    /// A missing table is an empty ledger, not an error.
    pub fn load_all(&self) -> LedgerResult<Vec<Transaction>> {
        let rows: Vec<Transaction> = read_csv(&self.path)?;
        debug!("Loaded {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    /// Validate and append a single transaction
    ///
    /// The category is normalized before validation. On any validation
    /// failure nothing is written. Returns the row as stored.
    pub fn append(&self, transaction: Transaction) -> LedgerResult<Transaction> {
        let transaction = Transaction::new(
            transaction.date,
            transaction.amount,
            &transaction.category,
        );
        transaction
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if self.is_empty_on_disk()? {
            write_csv_atomic(&self.path, &LEDGER_HEADER, std::slice::from_ref(&transaction))?;
        } else {
            append_csv_record(&self.path, &transaction)?;
        }

        info!("Appended {} to {}", transaction, self.path.display());
        Ok(transaction)
    }

    /// Overwrite the whole table with exactly the given rows
    ///
    /// Rows are written as given, without validation. The previous table
    /// stays intact if the write fails.
    pub fn replace_all(&self, rows: &[Transaction]) -> LedgerResult<()> {
        write_csv_atomic(&self.path, &LEDGER_HEADER, rows)?;
        info!("Rewrote {} with {} rows", self.path.display(), rows.len());
        Ok(())
    }

    /// Remove the row at a zero-based index, returning it
    pub fn remove_row(&self, index: usize) -> LedgerResult<Transaction> {
        let mut rows = self.load_all()?;
        if index >= rows.len() {
            return Err(LedgerError::row_not_found(index + 1));
        }

        let removed = rows.remove(index);
        self.replace_all(&rows)?;
        Ok(removed)
    }

    /// Edit the row at a zero-based index, returning the updated row
    ///
    /// The edited row must satisfy the same rules as an appended one.
    pub fn update_row(&self, index: usize, edit: &RowEdit) -> LedgerResult<Transaction> {
        let mut rows = self.load_all()?;
        let current = rows
            .get(index)
            .ok_or_else(|| LedgerError::row_not_found(index + 1))?;

        let updated = Transaction::new(
            edit.date.unwrap_or(current.date),
            edit.amount.unwrap_or(current.amount),
            edit.category.as_deref().unwrap_or(&current.category),
        );
        updated
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        rows[index] = updated.clone();
        self.replace_all(&rows)?;
        Ok(updated)
    }

    fn is_empty_on_disk(&self) -> LedgerResult<bool> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(LedgerError::Storage(format!(
                "Failed to inspect {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
