//! Lifetime Report
//!
//! All-time spending by category across every month in the ledger.

use serde::Serialize;

use super::monthly::{format_lines, CategoryLine, REPORT_WIDTH};
use crate::display::{double_separator, separator};
use crate::models::{Money, MonthKey, Transaction};
use crate::services::aggregate::{available_months, lifetime_summary};

/// Lifetime Report
#[derive(Debug, Clone, Serialize)]
pub struct LifetimeReport {
    /// Earliest month with data
    pub first_month: Option<MonthKey>,
    /// Latest month with data
    pub last_month: Option<MonthKey>,
    /// Spending by category
    pub lines: Vec<CategoryLine>,
    /// Total spending
    pub total: Money,
    /// Total transaction count
    pub transaction_count: usize,
}

impl LifetimeReport {
    pub fn generate(transactions: &[Transaction]) -> Self {
        let months = available_months(transactions);
        let summary = lifetime_summary(transactions);

        Self {
            first_month: months.iter().min().copied(),
            last_month: months.iter().max().copied(),
            lines: CategoryLine::from_summary(&summary),
            total: summary.total(),
            transaction_count: summary.transaction_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str("Lifetime Breakdown\n");
        output.push_str(&double_separator(REPORT_WIDTH));
        output.push('\n');

        let (first, last) = match (self.first_month, self.last_month) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                output.push_str("No expenses recorded yet.\n");
                return output;
            }
        };

        if first == last {
            output.push_str(&format!("Covering {}\n\n", first));
        } else {
            output.push_str(&format!("Covering {} to {}\n\n", first, last));
        }

        format_lines(&mut output, &self.lines, symbol);

        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>14} {:>7}\n",
            "TOTAL",
            self.total.format_with_symbol(symbol),
            self.transaction_count
        ));

        output
    }
}
