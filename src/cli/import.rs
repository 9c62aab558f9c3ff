//! CLI command handler for importing a ledger export
//!
//! Reads a JSON or YAML file written by `export`, checks it, and adds its
//! rows to the ledger (or replaces the ledger with them).

use std::path::Path;

use log::info;

use super::report::ExportFormat;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{import_from_json, import_from_yaml};
use crate::storage::LedgerStore;

/// Outcome of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows read from the export
    pub imported: usize,
    /// Rows in the ledger afterwards
    pub total: usize,
}

/// Import an export file into the ledger
///
/// The format is taken from `format`, else from the file extension
/// (`.yaml`/`.yml` is YAML, anything else JSON). The export is validated in
/// full before the ledger is touched, and the ledger is rewritten atomically.
pub fn handle_import_command(
    store: &LedgerStore,
    path: &Path,
    format: Option<ExportFormat>,
    replace: bool,
) -> LedgerResult<ImportSummary> {
    if !path.exists() {
        return Err(LedgerError::Export(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| LedgerError::Export(format!("Failed to read file: {}", e)))?;

    let export = match format.unwrap_or_else(|| detect_format(path)) {
        ExportFormat::Json => import_from_json(&content)?,
        ExportFormat::Yaml => import_from_yaml(&content)?,
    };

    let imported = export.transactions.len();
    let rows = if replace {
        export.transactions
    } else {
        let mut rows = store.load_all()?;
        rows.extend(export.transactions);
        rows
    };

    store.replace_all(&rows)?;
    info!(
        "Imported {} rows from {} (replace: {})",
        imported,
        path.display(),
        replace
    );

    Ok(ImportSummary {
        imported,
        total: rows.len(),
    })
}

fn detect_format(path: &Path) -> ExportFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            ExportFormat::Yaml
        }
        _ => ExportFormat::Json,
    }
}
