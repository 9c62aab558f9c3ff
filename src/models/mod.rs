//! Core data models
//!
//! This module contains the data structures of the expense domain:
//! transactions, amounts, months, budgets, and category normalization.

pub mod budget;
pub mod category;
pub mod money;
pub mod month;
pub mod transaction;

pub use budget::{Budget, BudgetError};
pub use category::normalize;
pub use money::{Money, MoneyParseError};
pub use month::{MonthKey, MonthParseError};
pub use transaction::{Transaction, TransactionValidationError, MAX_AMOUNT};
