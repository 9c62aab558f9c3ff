//! YAML Export functionality
//!
//! Exports the ledger to YAML for a human-readable backup.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::LedgerExport;
use crate::models::Transaction;

/// Export the ledger to YAML format
pub fn export_yaml<W: Write>(transactions: Vec<Transaction>, writer: &mut W) -> LedgerResult<()> {
    let export = LedgerExport::from_transactions(transactions);
    let export_err = |e: std::io::Error| LedgerError::Export(e.to_string());

    writeln!(writer, "# Expense Ledger Export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Parse a YAML export and check it before import
pub fn import_from_yaml(yaml_str: &str) -> LedgerResult<LedgerExport> {
    let export: LedgerExport =
        serde_yaml::from_str(yaml_str).map_err(|e| LedgerError::Export(e.to_string()))?;

    export.validate().map_err(LedgerError::Export)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_yaml_export() {
        let transactions = vec![Transaction::new(
            NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
            Money::from_cents(4299),
            "shopping",
        )];

        let mut buffer = Vec::new();
        export_yaml(transactions.clone(), &mut buffer).unwrap();

        let yaml_str = String::from_utf8(buffer).unwrap();
        assert!(yaml_str.starts_with("# Expense Ledger Export"));
        assert!(yaml_str.contains("Category: Shopping"));
        assert!(yaml_str.contains("schema_version"));

        let imported = import_from_yaml(&yaml_str).unwrap();
        assert_eq!(imported.transactions, transactions);
        assert_eq!(imported.month_totals[0].total, Money::from_cents(4299));
    }
}
