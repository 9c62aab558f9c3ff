//! Monthly aggregation
//!
//! Pure functions over a loaded ledger: filter by month, sum per category,
//! and compare a month's spending against its budget.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::{Budget, Money, MonthKey, Transaction};

/// Spending and row count for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub amount: Money,
    pub count: usize,
}

/// Per-category spending totals
///
/// Backed by an ordered map so iteration is alphabetical and stable.
/// Only categories that actually occur are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategorySummary {
    totals: BTreeMap<String, CategoryTotal>,
}

impl CategorySummary {
    /// Sum amounts per category over the given transactions
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals: BTreeMap<String, CategoryTotal> = BTreeMap::new();
        for txn in transactions {
            let entry = totals.entry(txn.category.clone()).or_default();
            entry.amount += txn.amount;
            entry.count += 1;
        }
        Self { totals }
    }

    /// Total for one category, if it occurs
    pub fn get(&self, category: &str) -> Option<Money> {
        self.totals.get(category).map(|t| t.amount)
    }

    /// Iterate categories in alphabetical order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), v.amount))
    }

    /// Iterate categories with their row counts, alphabetically
    pub fn entries(&self) -> impl Iterator<Item = (&str, CategoryTotal)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum across all categories
    pub fn total(&self) -> Money {
        self.totals.values().map(|t| t.amount).sum()
    }

    /// Number of transactions summarized
    pub fn transaction_count(&self) -> usize {
        self.totals.values().map(|t| t.count).sum()
    }

    /// Each category's percentage of the summary total (0-100), alphabetically
    pub fn shares(&self) -> Vec<(&str, f64)> {
        let total = self.total();
        self.iter()
            .map(|(category, amount)| (category, amount.ratio_of(total) * 100.0))
            .collect()
    }
}

/// Transactions falling in the given month, in ledger order
pub fn in_month<'a>(
    transactions: &'a [Transaction],
    month: &'a MonthKey,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions.iter().filter(move |t| month.contains(t.date))
}

/// Per-category totals for one month
pub fn summarize(transactions: &[Transaction], month: &MonthKey) -> CategorySummary {
    CategorySummary::from_transactions(in_month(transactions, month))
}

/// Total spending for one month; zero when nothing matches
pub fn total(transactions: &[Transaction], month: &MonthKey) -> Money {
    in_month(transactions, month).map(|t| t.amount).sum()
}

/// Per-category totals across the whole ledger
pub fn lifetime_summary(transactions: &[Transaction]) -> CategorySummary {
    CategorySummary::from_transactions(transactions)
}

/// Distinct months present in the ledger, in order of first appearance
pub fn available_months(transactions: &[Transaction]) -> Vec<MonthKey> {
    let mut seen = HashSet::new();
    transactions
        .iter()
        .map(Transaction::month)
        .filter(|month| seen.insert(*month))
        .collect()
}

/// Whether spending exceeded the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetState {
    /// Spending is at or below the budget
    WithinBudget,
    /// Spending is strictly above the budget
    OverBudget,
}

/// A month's spending compared against its budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget: Money,
    pub spent: Money,
    /// `budget - spent`; negative when over budget
    pub remaining: Money,
    pub state: BudgetState,
    /// `min(spent / budget, 1.0)`, for a progress bar
    pub progress: f64,
}

impl BudgetStatus {
    /// Compare spending against a budget
    pub fn evaluate(budget: Budget, spent: Money) -> Self {
        let budget = budget.amount();
        let state = if spent > budget {
            BudgetState::OverBudget
        } else {
            BudgetState::WithinBudget
        };

        let progress = if budget.is_positive() {
            spent.ratio_of(budget).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            budget,
            spent,
            remaining: budget - spent,
            state,
            progress,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.state == BudgetState::OverBudget
    }
}
