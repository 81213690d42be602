//! Funding-rate series ingestion
//!
//! Historical series reach the scanner in several shapes: a literal-encoded list in a
//! table cell, an already materialized sequence, or nothing at all. [`RawRates`] names
//! those shapes and [`RawRates::into_series`] turns each of them into the one canonical
//! `Vec<f64>` the computers work with.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hours covered by the 7-day window
pub const HOURS_7D: i64 = 7 * 24;

/// Hours covered by the 3-day window
pub const HOURS_3D: i64 = 3 * 24;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;

/// A historical rate column value as it arrives from upstream
#[derive(Debug, Clone, PartialEq)]
pub enum RawRates {
    /// Absent column or missing value
    Missing,
    /// Literal-encoded list, e.g. `[0.01, -0.002]`
    Encoded(String),
    /// Genuine sequence
    Values(Vec<f64>),
}

impl RawRates {
    /// Classify a table cell. Empty cells and `nan`/`null` markers are missing.
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell.map(str::trim) {
            None => RawRates::Missing,
            Some(text) if is_missing_marker(text) => RawRates::Missing,
            Some(text) => RawRates::Encoded(text.to_string()),
        }
    }

    /// Convert to the canonical series. Unparseable input yields an empty series.
    pub fn into_series(self) -> Vec<f64> {
        match self {
            RawRates::Missing => Vec::new(),
            RawRates::Values(values) => values,
            RawRates::Encoded(text) => parse_encoded(&text).unwrap_or_else(|| {
                debug!("Discarding unparseable historical rates: {:.40}", text);
                Vec::new()
            }),
        }
    }
}

fn is_missing_marker(text: &str) -> bool {
    text.is_empty()
        || text.eq_ignore_ascii_case("nan")
        || text.eq_ignore_ascii_case("null")
        || text.eq_ignore_ascii_case("none")
}

fn parse_encoded(text: &str) -> Option<Vec<f64>> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value
        .as_array()?
        .iter()
        .map(serde_json::Value::as_f64)
        .collect()
}

/// One funding payment observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingEvent {
    /// Settlement time in milliseconds since the epoch
    pub timestamp: Option<i64>,
    /// Funding rate
    pub rate: Option<f64>,
}

/// Main, 7-day and 3-day historical series for one pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundingHistory {
    /// Full requested window, oldest first
    pub historical_rates: Vec<f64>,
    /// Events settled within the last 7 days
    pub historical_rates_7d: Vec<f64>,
    /// Events settled within the last 3 days
    pub historical_rates_3d: Vec<f64>,
}

impl FundingHistory {
    /// Build the three windows from raw events.
    ///
    /// The sub-windows are selected by settlement time relative to `now_ms`, so they stay
    /// consistent with the main series even when it has gaps.
    pub fn from_events(events: &[FundingEvent], now_ms: i64) -> Self {
        let historical_rates = events.iter().filter_map(|e| e.rate).collect();

        Self {
            historical_rates,
            historical_rates_7d: rates_since(events, now_ms - HOURS_7D * MS_PER_HOUR),
            historical_rates_3d: rates_since(events, now_ms - HOURS_3D * MS_PER_HOUR),
        }
    }

    /// Build from already-windowed series
    pub fn from_raw(main: RawRates, last_7d: RawRates, last_3d: RawRates) -> Self {
        Self {
            historical_rates: main.into_series(),
            historical_rates_7d: last_7d.into_series(),
            historical_rates_3d: last_3d.into_series(),
        }
    }
}

fn rates_since(events: &[FundingEvent], cutoff_ms: i64) -> Vec<f64> {
    events
        .iter()
        .filter(|e| matches!(e.timestamp, Some(ts) if ts != 0 && ts >= cutoff_ms))
        .filter_map(|e| e.rate)
        .collect()
}
