//! CLI command handlers
//!
//! Bridges clap argument parsing with the storage, report and session
//! layers.

pub mod config;
pub mod expense;
pub mod import;
pub mod report;
pub mod shell;

pub use config::{handle_config_command, ConfigCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use import::{handle_import_command, ImportSummary};
pub use report::{handle_report_command, ExportFormat, ReportCommands};
pub use shell::{Flow, Shell};
