//! Monthly budget limit
//!
//! A budget is a spending ceiling for one month. It is never below one
//! currency unit, which keeps the progress ratio well defined.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// A validated monthly spending limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Money", into = "Money")]
pub struct Budget(Money);

impl Budget {
    /// Smallest budget a user may set
    pub const MIN: Money = Money::from_dollars_cents(1, 0);

    /// Budget assigned to a month the first time it is seen
    pub const DEFAULT: Budget = Budget(Money::from_dollars_cents(1000, 0));

    /// Create a budget, rejecting amounts below [`Budget::MIN`]
    pub fn new(amount: Money) -> Result<Self, BudgetError> {
        if amount < Self::MIN {
            return Err(BudgetError::BelowMinimum(amount));
        }
        Ok(Self(amount))
    }

    /// The limit as a money amount
    pub const fn amount(&self) -> Money {
        self.0
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Money> for Budget {
    type Error = BudgetError;

    fn try_from(amount: Money) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Budget> for Money {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

/// Budget validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BudgetError {
    #[error("Budget must be at least {}, got {0}", Budget::MIN)]
    BelowMinimum(Money),
}
