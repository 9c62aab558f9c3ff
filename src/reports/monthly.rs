//! Monthly Report
//!
//! Spending for one month broken down by category and compared against
//! that month's budget.

use serde::Serialize;

use crate::display::{double_separator, format_bar, format_percentage, separator, truncate};
use crate::models::{Budget, Money, MonthKey, Transaction};
use crate::services::aggregate::{summarize, total, BudgetStatus, CategorySummary};

/// Width of rendered reports
pub(crate) const REPORT_WIDTH: usize = 60;

/// Width of the budget progress bar
const BAR_WIDTH: usize = 40;

/// Spending for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLine {
    /// Category name
    pub category: String,
    /// Total spending
    pub amount: Money,
    /// Number of transactions
    pub count: usize,
    /// Percentage of total spending (0-100)
    pub share: f64,
}

impl CategoryLine {
    /// Lines for every category in a summary, largest amount first, then by name
    pub(crate) fn from_summary(summary: &CategorySummary) -> Vec<Self> {
        let mut lines: Vec<Self> = summary
            .entries()
            .zip(summary.shares())
            .map(|((category, totals), (_, share))| Self {
                category: category.to_string(),
                amount: totals.amount,
                count: totals.count,
                share,
            })
            .collect();

        lines.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        lines
    }
}

/// Render the category table shared by monthly and lifetime reports
pub(crate) fn format_lines(output: &mut String, lines: &[CategoryLine], symbol: &str) {
    output.push_str(&format!(
        "{:<28} {:>14} {:>7} {:>7}\n",
        "Category", "Amount", "Count", "%"
    ));
    output.push_str(&separator(REPORT_WIDTH));
    output.push('\n');

    for line in lines {
        output.push_str(&format!(
            "{:<28} {:>14} {:>7} {:>7}\n",
            truncate(&line.category, 28),
            line.amount.format_with_symbol(symbol),
            line.count,
            format_percentage(line.share)
        ));
    }
}

/// Monthly Report
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    /// Month the report covers
    pub month: MonthKey,
    /// Spending compared against the month's budget
    pub status: BudgetStatus,
    /// Spending by category
    pub lines: Vec<CategoryLine>,
    /// Total transaction count
    pub transaction_count: usize,
}

impl MonthlyReport {
    /// Generate the report for one month of the ledger
    pub fn generate(transactions: &[Transaction], month: MonthKey, budget: Budget) -> Self {
        let summary = summarize(transactions, &month);
        let spent = total(transactions, &month);

        Self {
            month,
            status: BudgetStatus::evaluate(budget, spent),
            lines: CategoryLine::from_summary(&summary),
            transaction_count: summary.transaction_count(),
        }
    }

    /// Total spending for the month
    pub fn spent(&self) -> Money {
        self.status.spent
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// The one-line budget verdict
    pub fn budget_line(&self, symbol: &str) -> String {
        if self.status.is_over_budget() {
            format!(
                "Over Budget by {} for {}!",
                (-self.status.remaining).format_with_symbol(symbol),
                self.month
            )
        } else {
            format!(
                "{} remaining for {}.",
                self.status.remaining.format_with_symbol(symbol),
                self.month
            )
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Monthly Summary: {}\n", self.month));
        output.push_str(&double_separator(REPORT_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "Budget: {}   Spent: {}\n",
            self.status.budget.format_with_symbol(symbol),
            self.status.spent.format_with_symbol(symbol)
        ));
        output.push_str(&self.budget_line(symbol));
        output.push('\n');
        output.push_str(&format!(
            "[{}] {}\n\n",
            format_bar(self.status.progress, BAR_WIDTH),
            format_percentage(self.status.progress * 100.0)
        ));

        if self.lines.is_empty() {
            output.push_str(&format!("No expenses recorded for {}.\n", self.month));
            return output;
        }

        format_lines(&mut output, &self.lines, symbol);

        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>14} {:>7}\n",
            "TOTAL",
            self.status.spent.format_with_symbol(symbol),
            self.transaction_count
        ));

        output
    }
}
