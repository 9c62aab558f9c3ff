//! Expense Ledger - personal expense tracking with monthly budgets
//!
//! Records expenses into a flat CSV ledger, normalizes free-text category
//! names so the same category always aggregates together, and compares
//! each month's spending against a budget.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Money, months, budgets, categories and transactions
//! - `storage`: CSV ledger store with atomic rewrites
//! - `services`: Monthly aggregation and the interactive session
//! - `reports`: Monthly summary and lifetime breakdown
//! - `display`: Terminal formatting helpers
//! - `export`: JSON and YAML export
//! - `feeds`: Location, weather and quote collaborators with fallbacks
//! - `cli`: Command handlers and the interactive shell
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_ledger::config::{LedgerPaths, Settings};
//! use expense_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! let rows = storage.ledger.load_all()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod feeds;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
