//! User settings for the expense ledger
//!
//! Manages display preferences, the default monthly budget, and the home
//! city used for the weather header.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::display::is_valid_date_format;
use crate::error::LedgerError;
use crate::models::{Budget, Money};
use crate::storage::file_io::write_json_atomic;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Budget assigned to a month the first time it is viewed
    #[serde(default = "default_budget")]
    pub default_budget: Money,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// City shown in the weather header; detection falls back when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_city: Option<String>,
}

/// Keys accepted by [`Settings::set`]
pub const SETTING_KEYS: &[&str] = &["currency_symbol", "default_budget", "date_format", "home_city"];

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_budget() -> Money {
    Budget::DEFAULT.amount()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_budget: default_budget(),
            date_format: default_date_format(),
            home_city: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// The default budget as a validated [`Budget`]
    pub fn default_budget(&self) -> Result<Budget, LedgerError> {
        Budget::new(self.default_budget)
            .map_err(|e| LedgerError::Config(format!("default_budget: {}", e)))
    }

    /// Change one setting from its text form
    ///
    /// An empty `home_city` clears it. Nothing is written until [`Settings::save`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        let value = value.trim();

        match key {
            "currency_symbol" => {
                if value.is_empty() {
                    return Err(LedgerError::Config("currency_symbol cannot be empty".into()));
                }
                self.currency_symbol = value.to_string();
            }
            "default_budget" => {
                let amount = Money::parse_exact(value)
                    .map_err(|e| LedgerError::Config(format!("default_budget: {}", e)))?;
                let budget = Budget::new(amount)
                    .map_err(|e| LedgerError::Config(format!("default_budget: {}", e)))?;
                self.default_budget = budget.amount();
            }
            "date_format" => {
                if value.is_empty() || !is_valid_date_format(value) {
                    return Err(LedgerError::Config(format!(
                        "date_format: invalid strftime pattern '{}'",
                        value
                    )));
                }
                self.date_format = value.to_string();
            }
            "home_city" => {
                self.home_city = Some(value.to_string()).filter(|city| !city.is_empty());
            }
            _ => {
                return Err(LedgerError::Config(format!(
                    "Unknown setting '{}'; expected one of: {}",
                    key,
                    SETTING_KEYS.join(", ")
                )))
            }
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), LedgerError> {
        self.default_budget()?;
        Ok(())
    }
}
