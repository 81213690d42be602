//! Settings validation utilities and defaults

use crate::{ArbitrageError, Result};
use chrono::format::{Item, StrftimeItems};
use std::collections::HashSet;

/// Configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate an exchange identifier (lowercase ids such as `binance`, `gate`, `kucoinfutures`)
    pub fn validate_exchange_id(exchange: &str) -> Result<()> {
        if exchange.is_empty() {
            return Err(ArbitrageError::Config("Exchange id cannot be empty".to_string()).into());
        }

        if !exchange.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ArbitrageError::Config(format!(
                "Exchange id '{}' must contain only alphanumeric characters or '_'",
                exchange
            ))
            .into());
        }

        Ok(())
    }

    /// Validate a list of exchange ids: each id well-formed, no duplicates
    pub fn validate_exchange_list(exchanges: &[String], name: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for exchange in exchanges {
            Self::validate_exchange_id(exchange)?;
            if !seen.insert(exchange.as_str()) {
                return Err(ArbitrageError::Config(format!(
                    "{} lists exchange '{}' more than once",
                    name, exchange
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate a non-negative value
    pub fn validate_non_negative(value: f64, name: &str) -> Result<()> {
        if value.is_nan() || value < 0.0 {
            return Err(ArbitrageError::Config(format!("{} must be non-negative", name)).into());
        }
        Ok(())
    }

    /// Validate a chrono strftime format string
    pub fn validate_date_format(format: &str) -> Result<()> {
        if format.is_empty() {
            return Err(ArbitrageError::Config("Date subfolder format cannot be empty".to_string()).into());
        }

        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ArbitrageError::Config(format!("Invalid date subfolder format: {}", format)).into());
        }

        Ok(())
    }
}

/// Configuration defaults
pub struct ConfigDefaults;

impl ConfigDefaults {
    /// Default main window in days
    pub const FUNDING_HISTORICAL_DAYS: u32 = 30;

    /// Default minimum absolute funding rate for spot-perp matching
    pub const FUNDING_RATE_THRESHOLD: f64 = 0.01;

    /// Default amplitude window in days
    pub const AMPLITUDE_DAYS: u32 = 30;

    /// Default base directory
    pub const DIRECTORY: &'static str = "funding_data";

    /// Default date subfolder format
    pub const DATE_SUBFOLDER_FORMAT: &'static str = "%Y%m%d";
}
