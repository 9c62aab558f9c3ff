//! Export module for the expense ledger
//!
//! - JSON: machine-readable full ledger export
//! - YAML: human-readable full ledger export

pub mod json;
pub mod yaml;

pub use json::{export_json, import_from_json, LedgerExport, MonthTotal, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_yaml, import_from_yaml};
