//! Expense CLI commands
//!
//! Recording, listing and correcting individual ledger rows.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_date;
use crate::error::{LedgerError, LedgerResult};
use crate::models::transaction::iso_date;
use crate::models::{Money, MonthKey, Transaction};
use crate::services::aggregate::available_months;
use crate::storage::{LedgerStore, RowEdit};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount (e.g., "12.50")
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Category; free text is normalized (e.g., "food & drink")
        #[arg(required = true, num_args = 1..)]
        category: Vec<String>,
        /// Expense date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List recorded expenses
    List {
        /// Only show this month (e.g., "March 2024" or "2024-03")
        #[arg(short, long)]
        month: Option<String>,
        /// Show only the most recent N rows
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Remove an expense by its row number
    Remove {
        /// Row number as shown by `list`
        index: usize,
    },

    /// Correct fields of an expense
    Edit {
        /// Row number as shown by `list`
        index: usize,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New amount
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List months that have expenses, most recent first
    Months,
}

/// Handle an expense command
pub fn handle_expense_command(
    store: &LedgerStore,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
        } => {
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(raw) => parse_date(&raw)?,
                None => Local::now().date_naive(),
            };

            let stored = store.append(Transaction::new(date, amount, &category.join(" ")))?;
            println!("Added {}!", stored.amount.format_with_symbol(symbol));
            println!(
                "  {} {} ({})",
                format_date(stored.date, &settings.date_format),
                stored.category,
                stored.month()
            );
        }

        ExpenseCommands::List { month, limit } => {
            let rows = store.load_all()?;
            let month = month.as_deref().map(parse_month).transpose()?;

            let mut numbered: Vec<(usize, &Transaction)> = rows
                .iter()
                .enumerate()
                .filter(|(_, t)| month.map_or(true, |m| t.month() == m))
                .map(|(idx, t)| (idx + 1, t))
                .collect();

            if let Some(limit) = limit {
                let skip = numbered.len().saturating_sub(limit);
                numbered = numbered.split_off(skip);
            }

            if numbered.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }

            println!("{:>5}  {:<12} {:<28} {:>12}", "#", "Date", "Category", "Amount");
            println!("{}", "-".repeat(60));
            for (number, txn) in &numbered {
                println!(
                    "{:>5}  {:<12} {:<28} {:>12}",
                    number,
                    format_date(txn.date, &settings.date_format),
                    txn.category,
                    txn.amount.format_with_symbol(symbol)
                );
            }

            let total: Money = numbered.iter().map(|(_, t)| t.amount).sum();
            println!("{}", "-".repeat(60));
            println!(
                "{} expense(s), total {}",
                numbered.len(),
                total.format_with_symbol(symbol)
            );
        }

        ExpenseCommands::Remove { index } => {
            let removed = store.remove_row(row_index(index)?)?;
            println!("Removed row {}: {}", index, removed);
        }

        ExpenseCommands::Edit {
            index,
            date,
            amount,
            category,
        } => {
            let edit = RowEdit {
                date: date.as_deref().map(parse_date).transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
            };

            if edit.is_empty() {
                return Err(LedgerError::Validation(
                    "Nothing to change; pass --date, --amount or --category".into(),
                ));
            }

            let updated = store.update_row(row_index(index)?, &edit)?;
            println!("Updated row {}: {}", index, updated);
        }

        ExpenseCommands::Months => {
            let mut months = available_months(&store.load_all()?);
            if months.is_empty() {
                println!("No expenses recorded yet.");
                return Ok(());
            }

            months.sort_by(|a, b| b.cmp(a));
            for month in months {
                println!("{}", month);
            }
        }
    }

    Ok(())
}

/// Parse a user-entered amount
pub fn parse_amount(raw: &str) -> LedgerResult<Money> {
    Money::parse_exact(raw).map_err(|e| LedgerError::Validation(e.to_string()))
}

/// Parse a user-entered date
pub fn parse_date(raw: &str) -> LedgerResult<NaiveDate> {
    iso_date::parse(raw.trim())
        .map_err(|_| LedgerError::Validation(format!("Invalid date (expected YYYY-MM-DD): {}", raw)))
}

/// Parse a user-entered month
pub fn parse_month(raw: &str) -> LedgerResult<MonthKey> {
    MonthKey::parse(raw).map_err(|e| LedgerError::Validation(e.to_string()))
}

/// Convert a 1-based row number into a 0-based index
pub(crate) fn row_index(number: usize) -> LedgerResult<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| LedgerError::Validation("Row numbers start at 1".into()))
}
