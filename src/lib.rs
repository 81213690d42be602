//! Funding-Rate Arbitrage Scanner
//!
//! Finds cross-exchange funding-rate arbitrage opportunities between perpetual futures
//! venues, and between perpetual futures and spot markets, from per-exchange funding
//! and amplitude snapshots.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod data;
pub mod output;
pub mod strategy;
pub mod utils;

// Re-export commonly used types
pub use config::ScannerConfig;
pub use data::{ExchangeDataset, FundingSnapshot, SpotAvailability};
pub use strategy::{FundingScanner, PerpPerpOpportunity, ScanOutcome, SpotPerpOpportunity};

/// Result type used throughout the application
pub type Result<T> = anyhow::Result<T>;

/// Common error types for the scanner
#[derive(thiserror::Error, Debug)]
pub enum ArbitrageError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    DataParsing(String),

    /// I/O error while reading datasets or writing results
    #[error("I/O error: {0}")]
    Io(String),

    /// No perpetual venue data could be loaded for the run
    #[error("No perpetual exchange data found in {0}")]
    NoVenueData(String),

    /// Result emission error
    #[error("Output error: {0}")]
    Output(String),
}

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
