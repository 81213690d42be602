//! Configuration management module

pub mod settings;

pub use settings::*;

use crate::{ArbitrageError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Prefix for environment variable overrides, e.g. `FUNDING__ANALYSIS__FUNDING_HISTORICAL_DAYS`
pub const ENV_PREFIX: &str = "FUNDING";

/// Main configuration structure for the funding-rate scanner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Analysis configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Exchange configuration
    #[serde(default)]
    pub exchanges: ExchangeListConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Parameters consumed by the opportunity computers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Window length in days for the main cumulative and APY calculations
    pub funding_historical_days: u32,
    /// Minimum absolute funding rate for spot-perp matching
    pub funding_rate_threshold: f64,
    /// Number of daily candles used upstream for amplitude statistics
    pub amplitude_days: u32,
    /// Analyze perpetual-perpetual opportunities
    pub get_perp_perp_opportunities: bool,
    /// Analyze spot-perpetual opportunities
    pub get_spot_perp_opportunities: bool,
}

impl AnalysisConfig {
    /// Number of hourly samples covered by the main window
    pub fn main_window_hours(&self) -> usize {
        self.funding_historical_days as usize * 24
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            funding_historical_days: ConfigDefaults::FUNDING_HISTORICAL_DAYS,
            funding_rate_threshold: ConfigDefaults::FUNDING_RATE_THRESHOLD,
            amplitude_days: ConfigDefaults::AMPLITUDE_DAYS,
            get_perp_perp_opportunities: true,
            get_spot_perp_opportunities: false,
        }
    }
}

/// Exchange list configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeListConfig {
    /// Perpetual venues, in the order combinations are generated
    pub perpetual: Vec<String>,
    /// Spot venues used to build the spot availability table
    pub spot: Vec<String>,
}

impl Default for ExchangeListConfig {
    fn default() -> Self {
        Self {
            perpetual: vec!["binance".to_string(), "gate".to_string()],
            spot: Vec::new(),
        }
    }
}

/// Result file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma-separated values
    Csv,
    /// JSON array of records
    Json,
}

impl FileFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Run directory and result file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base directory for datasets and results
    pub directory: String,
    /// Insert a date level below the base directory
    pub use_date_subfolder: bool,
    /// chrono format string for the date level
    pub date_subfolder_format: String,
    /// Fixed date level; empty means today
    pub date_subfolder: String,
    /// Result file format
    pub file_format: FileFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ConfigDefaults::DIRECTORY.to_string(),
            use_date_subfolder: true,
            date_subfolder_format: ConfigDefaults::DATE_SUBFOLDER_FORMAT.to_string(),
            date_subfolder: String::new(),
            file_format: FileFormat::Csv,
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a TOML file, with `FUNDING__` environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path.to_str().ok_or_else(|| {
            ArbitrageError::Config(format!("Config path is not valid UTF-8: {}", path.display()))
        })?;

        let settings = ::config::Config::builder()
            .add_source(::config::File::new(name, ::config::FileFormat::Toml))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ArbitrageError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ScannerConfig = settings
            .try_deserialize()
            .map_err(|e| ArbitrageError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ArbitrageError::Config(format!("Failed to parse config: {}", e)).into())
    }

    /// Serialize configuration to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ArbitrageError::Config(format!("Failed to serialize config: {}", e)).into())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;

        if analysis.funding_historical_days == 0 {
            return Err(ArbitrageError::Config("funding_historical_days must be greater than 0".to_string()).into());
        }

        if analysis.amplitude_days == 0 {
            return Err(ArbitrageError::Config("amplitude_days must be greater than 0".to_string()).into());
        }

        ConfigValidator::validate_non_negative(analysis.funding_rate_threshold, "funding_rate_threshold")?;

        if !analysis.get_perp_perp_opportunities && !analysis.get_spot_perp_opportunities {
            warn!("No opportunity type is enabled, runs will report nothing");
        }

        // Validate exchanges
        if self.exchanges.perpetual.is_empty() {
            return Err(ArbitrageError::Config("At least one perpetual exchange must be configured".to_string()).into());
        }

        ConfigValidator::validate_exchange_list(&self.exchanges.perpetual, "exchanges.perpetual")?;
        ConfigValidator::validate_exchange_list(&self.exchanges.spot, "exchanges.spot")?;

        if analysis.get_spot_perp_opportunities && self.exchanges.spot.is_empty() {
            warn!("Spot-perpetual analysis is enabled without spot exchanges and will be skipped");
        }

        // Validate output
        if self.output.directory.trim().is_empty() {
            return Err(ArbitrageError::Config("Output directory cannot be empty".to_string()).into());
        }

        if self.output.use_date_subfolder && self.output.date_subfolder.is_empty() {
            ConfigValidator::validate_date_format(&self.output.date_subfolder_format)?;
        }

        Ok(())
    }
}
