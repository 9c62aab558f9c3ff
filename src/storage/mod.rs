//! Storage layer
//!
//! Provides CSV storage for the ledger with atomic rewrites, plus the JSON
//! helpers used for settings.

pub mod file_io;
pub mod ledger;

pub use file_io::{read_csv, write_csv_atomic, write_json_atomic};
pub use ledger::{LedgerStore, RowEdit, LEDGER_HEADER};

use std::path::PathBuf;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Storage coordinator tying the resolved paths to the ledger repository
pub struct Storage {
    paths: LedgerPaths,
    pub ledger: LedgerStore,
}

impl Storage {
    /// Create storage at the default ledger location under `paths`
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            ledger: LedgerStore::new(paths.ledger_file()),
            paths,
        })
    }

    /// Create storage with an explicit ledger file, e.g. from `--file`
    pub fn with_ledger_file(paths: LedgerPaths, ledger_file: PathBuf) -> Self {
        Self {
            ledger: LedgerStore::new(ledger_file),
            paths,
        }
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert_eq!(
            storage.ledger.path(),
            temp_dir.path().join("data").join("expenses.csv")
        );
        assert!(!storage.ledger.exists());
    }

    #[test]
    fn test_explicit_ledger_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().join("config"));
        let file = temp_dir.path().join("mine.csv");

        let storage = Storage::with_ledger_file(paths, file.clone());

        assert_eq!(storage.ledger.path(), file);
        assert!(!storage.paths().data_dir().exists());
    }
}
