//! Configuration CLI commands
//!
//! Shows the resolved paths and settings, and changes individual settings.

use clap::Subcommand;
use log::info;

use crate::config::settings::{Settings, SETTING_KEYS};
use crate::error::LedgerResult;
use crate::storage::Storage;

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration and paths
    Show,

    /// Change a setting and save it
    Set {
        /// One of currency_symbol, default_budget, date_format, home_city
        key: String,
        /// New value; an empty home_city clears it
        value: String,
    },
}

/// Handle a config command
pub fn handle_config_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> LedgerResult<()> {
    match cmd {
        ConfigCommands::Show => print!("{}", describe(storage, settings)),

        ConfigCommands::Set { key, value } => {
            settings.set(&key, &value)?;
            settings.save(storage.paths())?;
            info!("Saved {} to {}", key, storage.paths().settings_file().display());
            println!("Set {}.", key);
        }
    }

    Ok(())
}

/// Paths and settings as shown by `config show`
pub fn describe(storage: &Storage, settings: &Settings) -> String {
    let paths = storage.paths();
    let symbol = settings.currency_symbol.as_str();

    let mut output = String::new();
    output.push_str("Expense Ledger Configuration\n");
    output.push_str("============================\n");
    output.push_str(&format!("Base directory: {}\n", paths.base_dir().display()));
    output.push_str(&format!("Settings file:  {}\n", paths.settings_file().display()));
    output.push_str(&format!("Ledger file:    {}\n", storage.ledger.path().display()));
    output.push_str("\nSettings:\n");
    output.push_str(&format!("  Currency symbol: {}\n", symbol));
    output.push_str(&format!(
        "  Default budget:  {}\n",
        settings.default_budget.format_with_symbol(symbol)
    ));
    output.push_str(&format!("  Date format:     {}\n", settings.date_format));
    output.push_str(&format!(
        "  Home city:       {}\n",
        settings.home_city.as_deref().unwrap_or("(not set)")
    ));
    output.push_str(&format!("\nSettable keys: {}\n", SETTING_KEYS.join(", ")));
    output
}
