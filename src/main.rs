use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_ledger::cli::{
    config::describe, handle_config_command, handle_expense_command, handle_import_command,
    handle_report_command, ConfigCommands, ExpenseCommands, ExportFormat, ReportCommands, Shell,
};
use expense_ledger::config::{paths::LedgerPaths, settings::Settings};
use expense_ledger::services::Session;
use expense_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Personal expense ledger with monthly budgets",
    long_about = "Records expenses to a CSV ledger, keeps category names consistent, \
                  and shows how each month's spending compares to its budget."
)]
struct Cli {
    /// Ledger CSV file to use instead of the one in the data directory
    #[arg(long, global = true, value_name = "PATH", env = "EXPENSE_LEDGER_FILE")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    #[command(flatten)]
    Report(ReportCommands),

    /// Import rows from a JSON or YAML export
    Import {
        /// Export file to read
        path: PathBuf,
        /// Input format; guessed from the file extension if omitted
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
        /// Replace the ledger instead of adding to it
        #[arg(long)]
        replace: bool,
    },

    /// Start the interactive shell
    Shell,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let storage = match cli.file {
        Some(file) => Storage::with_ledger_file(paths, file),
        None => Storage::new(paths)?,
    };

    match cli.command {
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage.ledger, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage.ledger, &settings, cmd)?;
        }
        Some(Commands::Shell) => {
            let session = Session::new(settings.default_budget()?);
            let mut shell = Shell::open(
                storage.ledger.clone(),
                session,
                settings.currency_symbol.clone(),
            )?;
            shell.run(io::stdin().lock(), io::stdout())?;
        }
        Some(Commands::Import {
            path,
            format,
            replace,
        }) => {
            let summary = handle_import_command(&storage.ledger, &path, format, replace)?;
            println!(
                "Imported {} expense(s); the ledger now has {}.",
                summary.imported, summary.total
            );
        }
        Some(Commands::Config { cmd: Some(cmd) }) => {
            handle_config_command(&storage, &mut settings, cmd)?;
        }
        Some(Commands::Config { cmd: None }) => {
            print!("{}", describe(&storage, &settings));
        }
        None => {
            println!("Expense Ledger - track spending against a monthly budget");
            println!();
            println!("Run 'ledger --help' for usage information.");
            println!("Run 'ledger shell' to start the interactive shell.");
        }
    }

    Ok(())
}
