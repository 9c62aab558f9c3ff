//! Reports module for the expense ledger
//!
//! Provides the monthly budget summary and the all-time category
//! breakdown.

pub mod lifetime;
pub mod monthly;

pub use lifetime::LifetimeReport;
pub use monthly::{CategoryLine, MonthlyReport};
