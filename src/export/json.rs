//! JSON Export functionality
//!
//! Exports the whole ledger to JSON with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, MonthKey, Transaction};
use crate::services::aggregate::{available_months, summarize, total};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Spending total for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: MonthKey,
    pub total: Money,
    pub transaction_count: usize,
}

/// Full ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// All transactions in ledger order
    pub transactions: Vec<Transaction>,

    /// Per-month totals, oldest first
    pub month_totals: Vec<MonthTotal>,
}

impl LedgerExport {
    /// Build an export from the loaded ledger
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let mut months = available_months(&transactions);
        months.sort();

        let month_totals = months
            .into_iter()
            .map(|month| {
                let summary = summarize(&transactions, &month);
                MonthTotal {
                    month,
                    total: summary.total(),
                    transaction_count: summary.transaction_count(),
                }
            })
            .collect();

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            transactions,
            month_totals,
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        for (idx, txn) in self.transactions.iter().enumerate() {
            txn.validate()
                .map_err(|e| format!("Transaction {} ({}): {}", idx + 1, txn, e))?;
        }

        for month_total in &self.month_totals {
            let expected = total(&self.transactions, &month_total.month);
            if expected != month_total.total {
                return Err(format!(
                    "Total for {} is {}, transactions sum to {}",
                    month_total.month, month_total.total, expected
                ));
            }
        }

        Ok(())
    }
}

/// Export the ledger to JSON
pub fn export_json<W: Write>(
    transactions: Vec<Transaction>,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let export = LedgerExport::from_transactions(transactions);

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

/// Parse a JSON export and check it before import
pub fn import_from_json(json_str: &str) -> LedgerResult<LedgerExport> {
    let export: LedgerExport =
        serde_json::from_str(json_str).map_err(|e| LedgerError::Export(e.to_string()))?;

    export.validate().map_err(LedgerError::Export)?;

    Ok(export)
}
