//! Report CLI commands
//!
//! Monthly summary, lifetime breakdown, data export and the dashboard.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use log::info;

use super::expense::{parse_amount, parse_month};
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_json, export_yaml};
use crate::feeds::{weather_or_fallback, ConfiguredCity, Offline};
use crate::models::{MonthKey, Transaction};
use crate::reports::{LifetimeReport, MonthlyReport};
use crate::services::aggregate::available_months;
use crate::services::Session;
use crate::storage::LedgerStore;

/// Export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Yaml,
}

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Show spending against the budget for a month
    Summary {
        /// Month to show (e.g., "March 2024" or "2024-03"); defaults to the latest
        #[arg(short, long)]
        month: Option<String>,
        /// Budget for the month; defaults to the configured default budget
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Show all-time spending by category
    Breakdown,

    /// Export the whole ledger
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the weather and quote header with the latest summary
    Dashboard,
}

/// Handle a report command
pub fn handle_report_command(
    store: &LedgerStore,
    settings: &Settings,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Summary { month, budget } => {
            let rows = store.load_all()?;
            let month = match month {
                Some(raw) => parse_month(&raw)?,
                None => latest_month(&rows),
            };

            let mut session = Session::new(settings.default_budget()?);
            if let Some(raw) = budget {
                session.set_budget(month, parse_amount(&raw)?)?;
            }

            let report = MonthlyReport::generate(&rows, month, session.budget_for(month));
            print!("{}", report.format_terminal(symbol));
        }

        ReportCommands::Breakdown => {
            let report = LifetimeReport::generate(&store.load_all()?);
            print!("{}", report.format_terminal(symbol));
        }

        ReportCommands::Export { format, output } => {
            let rows = store.load_all()?;
            let count = rows.len();

            match &output {
                Some(path) => {
                    let file = File::create(path).map_err(|e| {
                        LedgerError::Export(format!("Failed to create {}: {}", path.display(), e))
                    })?;
                    let mut writer = BufWriter::new(file);
                    write_export(rows, format, &mut writer)?;
                    writer
                        .flush()
                        .map_err(|e| LedgerError::Export(e.to_string()))?;

                    info!("Exported {} rows to {}", count, path.display());
                    eprintln!("Exported {} expense(s) to {}", count, path.display());
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    write_export(rows, format, &mut handle)?;
                }
            }
        }

        ReportCommands::Dashboard => {
            let rows = store.load_all()?;
            let mut session = Session::new(settings.default_budget()?);
            let locator = ConfiguredCity::new(settings.home_city.clone());

            let city = session.detected_city(&locator).to_string();
            let weather = weather_or_fallback(&Offline, &city);
            println!("{} | {} | {}", city, weather.temperature, weather.condition);
            println!("{}", session.quote(&Offline));
            println!();

            let month = latest_month(&rows);
            let report = MonthlyReport::generate(&rows, month, session.budget_for(month));
            print!("{}", report.format_terminal(symbol));
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    rows: Vec<Transaction>,
    format: ExportFormat,
    writer: &mut W,
) -> LedgerResult<()> {
    match format {
        ExportFormat::Json => export_json(rows, writer, true),
        ExportFormat::Yaml => export_yaml(rows, writer),
    }
}

/// Most recent month with data, or the current month for an empty ledger
pub fn latest_month(rows: &[Transaction]) -> MonthKey {
    available_months(rows)
        .into_iter()
        .max()
        .unwrap_or_else(MonthKey::current)
}
