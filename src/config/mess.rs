//! Mess configuration loading from config.toml
//!
//! Billing rates, the ledger blob key and the food menu are fixed for the
//! lifetime of the process. They default to the built-in values below and can
//! be overridden by a TOML file read once at start-up.

use crate::core::billing::BillingRates;
use crate::core::order::{Menu, MenuItem};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Blob key the ledger is stored under unless configured otherwise.
pub const DEFAULT_LEDGER_KEY: &str = "messData";
/// Cost of one plan meal.
pub const DEFAULT_COST_PER_PLAN_MEAL: f64 = 60.0;
/// Fixed monthly fee added to every bill.
pub const DEFAULT_MONTHLY_PLAN_BASE_CHARGE: f64 = 0.0;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessConfig {
    /// Blob store key holding the serialized ledger
    pub ledger_key: String,
    /// Cost of one plan meal for enrolled students
    pub cost_per_plan_meal: f64,
    /// Fixed fee added to every monthly bill
    pub monthly_plan_base_charge: f64,
    /// Items that can be ordered individually
    pub menu: Vec<MenuItem>,
}

impl Default for MessConfig {
    fn default() -> Self {
        Self {
            ledger_key: DEFAULT_LEDGER_KEY.to_string(),
            cost_per_plan_meal: DEFAULT_COST_PER_PLAN_MEAL,
            monthly_plan_base_charge: DEFAULT_MONTHLY_PLAN_BASE_CHARGE,
            menu: Menu::default().items().to_vec(),
        }
    }
}

impl MessConfig {
    /// Billing rates derived from this configuration.
    #[must_use]
    pub const fn rates(&self) -> BillingRates {
        BillingRates {
            cost_per_plan_meal: self.cost_per_plan_meal,
            monthly_plan_base_charge: self.monthly_plan_base_charge,
        }
    }

    /// Validated menu built from this configuration.
    pub fn menu(&self) -> Result<Menu> {
        Menu::new(self.menu.clone())
    }

    /// Checks every value the ledger relies on.
    ///
    /// # Errors
    /// Returns `Error::Config` if the ledger key is blank, a rate is negative or
    /// not finite, or the menu is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.ledger_key.trim().is_empty() {
            return Err(Error::Config {
                message: "ledger_key cannot be empty".to_string(),
            });
        }

        for (field, value) in [
            ("cost_per_plan_meal", self.cost_per_plan_meal),
            ("monthly_plan_base_charge", self.monthly_plan_base_charge),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config {
                    message: format!("{field} must be a non-negative number, got {value}"),
                });
            }
        }

        self.menu().map(|_| ())
    }
}

/// Path of the config file, from `MESS_CONFIG` or `./config.toml`.
#[must_use]
pub fn config_path() -> PathBuf {
    std::env::var("MESS_CONFIG").map_or_else(|_| PathBuf::from("config.toml"), PathBuf::from)
}

/// Parses and validates a configuration from TOML text.
///
/// # Errors
/// Returns `Error::Config` if the TOML is malformed or fails validation.
pub fn parse_config(contents: &str) -> Result<MessConfig> {
    let config: MessConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads the configuration from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A rate or menu entry is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MessConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads the configuration file if it exists, otherwise the built-in defaults.
///
/// # Errors
/// Returns an error only when the file exists and is invalid.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<MessConfig> {
    let path_ref = path.as_ref();
    if path_ref.exists() {
        load_config(path_ref)
    } else {
        info!(
            "No config file at {}, using built-in rates and menu.",
            path_ref.display()
        );
        Ok(MessConfig::default())
    }
}
