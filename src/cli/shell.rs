//! Interactive shell
//!
//! Each input line is one event. The handler parses it, calls the pure
//! ledger components, updates the [`Session`], and returns the text to
//! show. Nothing here holds state beyond the session and a cached copy of
//! the ledger that is reloaded after every write.

use std::io::{BufRead, Write};

use chrono::Local;
use log::debug;

use super::expense::{parse_amount, parse_date, parse_month, row_index};
use crate::error::{LedgerError, LedgerResult};
use crate::models::category::PRESET_CATEGORIES;
use crate::models::{MonthKey, Transaction};
use crate::reports::{LifetimeReport, MonthlyReport};
use crate::services::aggregate::available_months;
use crate::services::Session;
use crate::storage::{LedgerStore, RowEdit};

/// A command available in the shell
#[derive(Debug, Clone)]
pub struct ShellCommand {
    /// Command name (what user types)
    pub name: &'static str,
    /// Argument synopsis
    pub usage: &'static str,
    /// Short description
    pub description: &'static str,
    pub action: ShellAction,
}

/// Actions that shell commands perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    Add,
    List,
    Remove,
    Edit,
    SelectMonth,
    SetBudget,
    Summary,
    Months,
    Breakdown,
    Help,
    Quit,
}

/// All available commands
pub static SHELL_COMMANDS: &[ShellCommand] = &[
    ShellCommand {
        name: "add",
        usage: "add <amount> <category> [@YYYY-MM-DD]",
        description: "Record an expense, dated today unless given",
        action: ShellAction::Add,
    },
    ShellCommand {
        name: "list",
        usage: "list",
        description: "List the selected month's expenses with row numbers",
        action: ShellAction::List,
    },
    ShellCommand {
        name: "remove",
        usage: "remove <row>",
        description: "Remove an expense by row number",
        action: ShellAction::Remove,
    },
    ShellCommand {
        name: "edit",
        usage: "edit <row> <field> <value>",
        description: "Change the date, amount or category of a row",
        action: ShellAction::Edit,
    },
    ShellCommand {
        name: "month",
        usage: "month [<month>]",
        description: "Show or change the selected month",
        action: ShellAction::SelectMonth,
    },
    ShellCommand {
        name: "budget",
        usage: "budget <amount>",
        description: "Set the budget for the selected month",
        action: ShellAction::SetBudget,
    },
    ShellCommand {
        name: "summary",
        usage: "summary",
        description: "Show the selected month against its budget",
        action: ShellAction::Summary,
    },
    ShellCommand {
        name: "months",
        usage: "months",
        description: "List months with expenses",
        action: ShellAction::Months,
    },
    ShellCommand {
        name: "breakdown",
        usage: "breakdown",
        description: "Show all-time spending by category",
        action: ShellAction::Breakdown,
    },
    ShellCommand {
        name: "help",
        usage: "help",
        description: "Show this help",
        action: ShellAction::Help,
    },
    ShellCommand {
        name: "quit",
        usage: "quit",
        description: "Leave the shell",
        action: ShellAction::Quit,
    },
];

/// Find a command by name; `exit` is accepted for `quit`
pub fn find_command(name: &str) -> Option<&'static ShellCommand> {
    let name = match name {
        "exit" => "quit",
        other => other,
    };
    SHELL_COMMANDS.iter().find(|cmd| cmd.name == name)
}

/// What the loop should do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit(String),
}

impl Flow {
    pub fn text(&self) -> &str {
        match self {
            Flow::Continue(text) | Flow::Quit(text) => text,
        }
    }
}

/// Interactive shell over one ledger file
pub struct Shell {
    store: LedgerStore,
    session: Session,
    symbol: String,
    rows: Vec<Transaction>,
}

impl Shell {
    /// Load the ledger and select the most recent month
    pub fn open(
        store: LedgerStore,
        session: Session,
        symbol: impl Into<String>,
    ) -> LedgerResult<Self> {
        let mut shell = Self {
            store,
            session,
            symbol: symbol.into(),
            rows: Vec::new(),
        };
        shell.reload()?;
        Ok(shell)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle one line of input
    ///
    /// Validation problems come back as warnings and storage failures as
    /// errors; neither ends the session.
    pub fn handle(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue(String::new());
        }

        let (name, args) = match line.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (line, ""),
        };

        let command = match find_command(&name.to_lowercase()) {
            Some(command) => command,
            None => {
                return Flow::Continue(format!(
                    "Unknown command: {}. Type 'help' for a list of commands.",
                    name
                ))
            }
        };

        debug!("Shell event {:?} with args {:?}", command.action, args);

        let result = match command.action {
            ShellAction::Quit => return Flow::Quit("Goodbye!".into()),
            ShellAction::Help => Ok(help_text()),
            ShellAction::Add => self.add(args),
            ShellAction::List => self.list(),
            ShellAction::Remove => self.remove(args),
            ShellAction::Edit => self.edit(args),
            ShellAction::SelectMonth => self.select_month(args),
            ShellAction::SetBudget => self.set_budget(args),
            ShellAction::Summary => self.summary(),
            ShellAction::Months => Ok(self.months()),
            ShellAction::Breakdown => {
                Ok(LifetimeReport::generate(&self.rows).format_terminal(&self.symbol))
            }
        };

        Flow::Continue(match result {
            Ok(text) => text,
            Err(e @ LedgerError::Validation(_)) => format!("Warning: {}", e),
            Err(e) => format!("Error: {}", e),
        })
    }

    /// Read events from `input` until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> LedgerResult<()> {
        writeln!(output, "Expense ledger shell. Type 'help' for commands.")?;
        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            let flow = self.handle(&line?);
            if !flow.text().is_empty() {
                writeln!(output, "{}", flow.text().trim_end())?;
            }
            if let Flow::Quit(_) = flow {
                return Ok(());
            }
            write!(output, "> ")?;
            output.flush()?;
        }

        writeln!(output)?;
        Ok(())
    }

    fn reload(&mut self) -> LedgerResult<()> {
        self.rows = self.store.load_all()?;
        self.session.reconcile_selection(&available_months(&self.rows));
        Ok(())
    }

    fn add(&mut self, args: &str) -> LedgerResult<String> {
        let usage =
            || LedgerError::Validation("Usage: add <amount> <category> [@YYYY-MM-DD]".into());
        let (amount, rest) = args.split_once(char::is_whitespace).ok_or_else(usage)?;

        // A trailing @date token overrides today
        let (category, date) = match rest.trim_end().rsplit_once(char::is_whitespace) {
            Some((category, last)) if last.starts_with('@') => {
                (category, parse_date(&last[1..])?)
            }
            _ if rest.trim_start().starts_with('@') => return Err(usage()),
            _ => (rest, Local::now().date_naive()),
        };

        let amount = parse_amount(amount)?;
        let stored = self.store.append(Transaction::new(date, amount, category))?;

        self.reload()?;
        Ok(format!(
            "Added {}! ({}, {})",
            stored.amount.format_with_symbol(&self.symbol),
            stored.category,
            stored.date
        ))
    }

    fn list(&self) -> LedgerResult<String> {
        let month = self.require_month()?;
        let lines: Vec<String> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, t)| month.contains(t.date))
            .map(|(idx, t)| {
                format!(
                    "{:>5}  {}  {:<28} {:>12}",
                    idx + 1,
                    t.date,
                    t.category,
                    t.amount.format_with_symbol(&self.symbol)
                )
            })
            .collect();

        if lines.is_empty() {
            return Ok(format!("No expenses recorded for {}.", month));
        }
        Ok(lines.join("\n"))
    }

    fn remove(&mut self, args: &str) -> LedgerResult<String> {
        let number = parse_row_number(args)?;
        let removed = self.store.remove_row(row_index(number)?)?;

        self.reload()?;
        Ok(format!("Removed row {}: {}", number, removed))
    }

    fn edit(&mut self, args: &str) -> LedgerResult<String> {
        let usage = || {
            LedgerError::Validation("Usage: edit <row> <date|amount|category> <value>".into())
        };
        let mut parts = args.splitn(3, char::is_whitespace);
        let (number, field, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(number), Some(field), Some(value)) if !value.trim().is_empty() => {
                (number, field, value.trim())
            }
            _ => return Err(usage()),
        };

        let number = parse_row_number(number)?;
        let mut edit = RowEdit::default();
        match field.to_lowercase().as_str() {
            "date" => edit.date = Some(parse_date(value)?),
            "amount" => edit.amount = Some(parse_amount(value)?),
            "category" => edit.category = Some(value.to_string()),
            _ => return Err(usage()),
        }

        let updated = self.store.update_row(row_index(number)?, &edit)?;

        self.reload()?;
        Ok(format!("Updated row {}: {}", number, updated))
    }

    fn select_month(&mut self, args: &str) -> LedgerResult<String> {
        if args.is_empty() {
            return Ok(match self.session.selected_month() {
                Some(month) => format!("Selected month: {}", month),
                None => "No expenses recorded yet.".into(),
            });
        }

        let month = parse_month(args)?;
        if !available_months(&self.rows).contains(&month) {
            return Err(LedgerError::Validation(format!(
                "No expenses recorded for {}",
                month
            )));
        }

        self.session.select_month(month);
        Ok(format!("Selected month: {}", month))
    }

    fn set_budget(&mut self, args: &str) -> LedgerResult<String> {
        let month = self.require_month()?;
        let budget = self.session.set_budget(month, parse_amount(args)?)?;
        Ok(format!(
            "Budget for {} set to {}.",
            month,
            budget.amount().format_with_symbol(&self.symbol)
        ))
    }

    fn summary(&mut self) -> LedgerResult<String> {
        let month = self.require_month()?;
        let budget = self.session.budget_for(month);
        Ok(MonthlyReport::generate(&self.rows, month, budget).format_terminal(&self.symbol))
    }

    fn months(&self) -> String {
        let mut months = available_months(&self.rows);
        if months.is_empty() {
            return "No expenses recorded yet.".into();
        }

        months.sort_by(|a, b| b.cmp(a));
        let selected = self.session.selected_month();
        months
            .into_iter()
            .map(|month| {
                let marker = if Some(month) == selected { "*" } else { " " };
                format!("{} {}", marker, month)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn require_month(&self) -> LedgerResult<MonthKey> {
        self.session
            .selected_month()
            .ok_or_else(|| LedgerError::Validation("No expenses recorded yet.".into()))
    }
}

fn parse_row_number(raw: &str) -> LedgerResult<usize> {
    raw.trim()
        .parse()
        .map_err(|_| LedgerError::Validation(format!("Invalid row number: {}", raw.trim())))
}

fn help_text() -> String {
    let mut text = String::from("Commands:\n");
    for command in SHELL_COMMANDS {
        text.push_str(&format!("  {:<38} {}\n", command.usage, command.description));
    }
    text.push_str(&format!("\nSuggested categories: {}\n", PRESET_CATEGORIES.join(", ")));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn txn(y: i32, m: u32, d: u32, cents: i64, category: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            Money::from_cents(cents),
            category,
        )
    }

    fn create_test_shell(rows: &[Transaction]) -> (TempDir, Shell) {
        let temp_dir = TempDir::new().unwrap();
        let store = LedgerStore::new(temp_dir.path().join("expenses.csv"));
        if !rows.is_empty() {
            store.replace_all(rows).unwrap();
        }
        let shell = Shell::open(store, Session::default(), "$").unwrap();
        (temp_dir, shell)
    }

    fn text(flow: Flow) -> String {
        match flow {
            Flow::Continue(text) => text,
            Flow::Quit(text) => panic!("unexpected quit: {}", text),
        }
    }

    #[test]
    fn test_find_command() {
        assert_eq!(find_command("add").unwrap().action, ShellAction::Add);
        assert_eq!(find_command("exit").unwrap().action, ShellAction::Quit);
        assert!(find_command("nope").is_none());
    }

    #[test]
    fn test_opens_on_most_recent_month() {
        let (_temp_dir, shell) = create_test_shell(&[
            txn(2024, 3, 1, 1000, "Food"),
            txn(2024, 1, 1, 1000, "Food"),
        ]);
        assert_eq!(
            shell.session().selected_month(),
            Some(MonthKey::new(2024, 3).unwrap())
        );
    }

    #[test]
    fn test_budget_and_summary() {
        let (_temp_dir, mut shell) = create_test_shell(&[
            txn(2024, 3, 1, 1500, "Food"),
            txn(2024, 3, 2, 1000, "Bills"),
        ]);

        let out = text(shell.handle("budget 20"));
        assert_eq!(out, "Budget for March 2024 set to $20.00.");

        let out = text(shell.handle("summary"));
        assert!(out.contains("Over Budget by $5.00 for March 2024!"));
    }

    #[test]
    fn test_budget_below_minimum_is_warning() {
        let (_temp_dir, mut shell) = create_test_shell(&[txn(2024, 3, 1, 1500, "Food")]);

        let out = text(shell.handle("budget 0.50"));
        assert!(out.starts_with("Warning:"));

        let march = MonthKey::new(2024, 3).unwrap();
        let out = text(shell.handle("summary"));
        assert!(out.contains(&format!("$985.00 remaining for {}.", march)));
    }

    #[test]
    fn test_select_month() {
        let (_temp_dir, mut shell) = create_test_shell(&[
            txn(2024, 3, 1, 1500, "Food"),
            txn(2024, 1, 9, 700, "Transport"),
        ]);

        assert_eq!(text(shell.handle("month Jan 2024")), "Selected month: January 2024");
        assert!(text(shell.handle("month 2020-01")).starts_with("Warning:"));
        assert!(text(shell.handle("month banana")).starts_with("Warning:"));

        let months = text(shell.handle("months"));
        assert_eq!(months, "  March 2024\n* January 2024");
    }

    #[test]
    fn test_add_event() {
        let (_temp_dir, mut shell) = create_test_shell(&[]);
        assert!(text(shell.handle("summary")).starts_with("Warning:"));

        let out = text(shell.handle("add 4.50 coffee"));
        assert!(out.starts_with("Added $4.50! (Coffee, "));
        assert_eq!(shell.session().selected_month(), Some(MonthKey::current()));

        assert!(text(shell.handle("add -3 Food")).starts_with("Warning:"));
        assert!(text(shell.handle("add 3")).starts_with("Warning:"));
        assert!(text(shell.handle("add 0.009 Food")).starts_with("Warning:"));
    }

    #[test]
    fn test_add_with_date() {
        let (_temp_dir, mut shell) = create_test_shell(&[txn(2024, 3, 1, 1500, "Food")]);

        let out = text(shell.handle("add 12 eating out @2024-02-14"));
        assert_eq!(out, "Added $12.00! (Eating Out, 2024-02-14)");

        let rows = shell.store.load_all().unwrap();
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        assert!(text(shell.handle("months")).contains("February 2024"));

        assert!(text(shell.handle("add 5 Food @2024-02-30")).starts_with("Warning:"));
        assert!(text(shell.handle("add 5 @2024-02-01")).starts_with("Warning:"));
        assert_eq!(shell.store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_list_selected_month() {
        let (_temp_dir, mut shell) = create_test_shell(&[
            txn(2024, 3, 1, 1500, "Food"),
            txn(2024, 1, 9, 700, "Transport"),
            txn(2024, 3, 4, 250, "Coffee"),
        ]);

        let out = text(shell.handle("list"));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("1  2024-03-01  Food"));
        assert!(lines[1].trim_start().starts_with("3  2024-03-04  Coffee"));
        assert!(!out.contains("Transport"));
    }

    #[test]
    fn test_remove_event() {
        let (_temp_dir, mut shell) = create_test_shell(&[
            txn(2024, 3, 1, 1500, "Food"),
            txn(2024, 1, 9, 700, "Transport"),
        ]);

        let out = text(shell.handle("remove 1"));
        assert!(out.starts_with("Removed row 1:"));
        // Selection follows the data once March is gone
        assert_eq!(
            shell.session().selected_month(),
            Some(MonthKey::new(2024, 1).unwrap())
        );

        assert!(text(shell.handle("remove 5")).starts_with("Error:"));
        assert!(text(shell.handle("remove 0")).starts_with("Warning:"));
        assert!(text(shell.handle("remove x")).starts_with("Warning:"));
        assert_eq!(shell.store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_event() {
        let (_temp_dir, mut shell) = create_test_shell(&[
            txn(2024, 3, 1, 1500, "Food"),
            txn(2024, 3, 2, 700, "Transport"),
        ]);

        let out = text(shell.handle("edit 2 category  eating out "));
        assert!(out.starts_with("Updated row 2:"));
        assert!(text(shell.handle("edit 2 amount 9.25")).starts_with("Updated"));
        assert!(text(shell.handle("edit 1 date 2024-02-28")).starts_with("Updated"));

        let rows = shell.store.load_all().unwrap();
        assert_eq!(rows[1].category, "Eating Out");
        assert_eq!(rows[1].amount, Money::from_cents(925));
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());

        assert!(text(shell.handle("edit 1 amount 0")).starts_with("Warning:"));
        assert!(text(shell.handle("edit 1 colour red")).starts_with("Warning:"));
        assert!(text(shell.handle("edit 1 amount")).starts_with("Warning:"));
        assert_eq!(shell.store.load_all().unwrap()[0].amount, Money::from_cents(1500));
    }

    #[test]
    fn test_unknown_and_empty_input() {
        let (_temp_dir, mut shell) = create_test_shell(&[]);
        assert_eq!(shell.handle("   "), Flow::Continue(String::new()));
        assert!(text(shell.handle("frobnicate")).starts_with("Unknown command"));
        assert!(text(shell.handle("HELP")).contains("budget <amount>"));
    }

    #[test]
    fn test_run_until_quit() {
        let (_temp_dir, mut shell) = create_test_shell(&[txn(2024, 3, 1, 1500, "Food")]);
        let input = "months\nquit\nsummary\n".as_bytes();
        let mut output = Vec::new();

        shell.run(input, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("* March 2024"));
        assert!(output.contains("Goodbye!"));
        assert!(!output.contains("Monthly Summary"));
    }
}
