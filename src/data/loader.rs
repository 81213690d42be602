//! Loading per-venue tables from the run's data directory
//!
//! Perpetual venues are read from `funding_rates_{exchange}.csv`, spot venues from
//! `spot_pairs_{exchange}.csv`. A missing file skips the venue; only the complete
//! absence of perpetual data is an error.
//!
//! A venue without a funding table may instead ship its raw exports:
//! `funding_events_{exchange}.csv` (one row per settlement) and optionally
//! `candles_{exchange}.csv` (daily OHLCV). The snapshot windows and amplitude statistics
//! are then derived at load time, relative to the loader's reference time.

use super::{
    AmplitudeStats, Candle, ExchangeDataset, FundingEvent, FundingHistory, FundingSnapshot, RawRates,
    SpotAvailability,
};
use crate::config::ConfigDefaults;
use crate::{log_venue, utils::metrics, ArbitrageError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// One row of a perpetual funding table
#[derive(Debug, Deserialize)]
struct FundingRow {
    pair: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    rate: Option<f64>,
    #[serde(default)]
    historical_rates: Option<String>,
    #[serde(default)]
    historical_rates_7d: Option<String>,
    #[serde(default)]
    historical_rates_3d: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    mean_daily_amplitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    max_daily_amplitude: Option<f64>,
    // Written as a float by tabular tools when the column has gaps
    #[serde(default, deserialize_with = "csv::invalid_option")]
    amplitude_days: Option<f64>,
}

impl FundingRow {
    fn into_snapshot(self) -> FundingSnapshot {
        let history = FundingHistory::from_raw(
            RawRates::from_cell(self.historical_rates.as_deref()),
            RawRates::from_cell(self.historical_rates_7d.as_deref()),
            RawRates::from_cell(self.historical_rates_3d.as_deref()),
        );

        let mut snapshot = FundingSnapshot::new(self.pair)
            .with_current_rate(self.rate.filter(|r| !r.is_nan()))
            .with_history(history);
        snapshot.mean_daily_amplitude = self.mean_daily_amplitude.unwrap_or(f64::NAN);
        snapshot.max_daily_amplitude = self.max_daily_amplitude.unwrap_or(f64::NAN);
        snapshot.amplitude_days = self
            .amplitude_days
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d as u32);
        snapshot
    }
}

/// One row of a spot pair table
#[derive(Debug, Deserialize)]
struct SpotRow {
    pair: String,
}

/// One settlement of a funding event export
#[derive(Debug, Deserialize)]
struct EventRow {
    pair: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    timestamp: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    rate: Option<f64>,
}

/// One daily candle of a candle export
#[derive(Debug, Deserialize)]
struct CandleRow {
    pair: String,
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

impl CandleRow {
    fn into_candle(self) -> (String, Candle) {
        let candle = Candle {
            timestamp: self.timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        };
        (self.pair, candle)
    }
}

/// Reads venue tables from a data directory
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    data_dir: PathBuf,
    reference_ms: i64,
    amplitude_days: u32,
}

impl DatasetLoader {
    /// Create a loader over `data_dir`, with windows measured back from now
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            reference_ms: chrono::Utc::now().timestamp_millis(),
            amplitude_days: ConfigDefaults::AMPLITUDE_DAYS,
        }
    }

    /// Measure event and candle windows back from `reference_ms` instead of now
    pub fn with_reference_time(mut self, reference_ms: i64) -> Self {
        self.reference_ms = reference_ms;
        self
    }

    /// Number of trailing days of candles used for amplitude statistics
    pub fn with_amplitude_days(mut self, days: u32) -> Self {
        self.amplitude_days = days;
        self
    }

    /// Data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a perpetual venue's funding table
    pub fn funding_rates_path(&self, exchange: &str) -> PathBuf {
        self.data_dir.join(format!("funding_rates_{}.csv", exchange))
    }

    /// Path of a spot venue's pair table
    pub fn spot_pairs_path(&self, exchange: &str) -> PathBuf {
        self.data_dir.join(format!("spot_pairs_{}.csv", exchange))
    }

    /// Path of a perpetual venue's raw funding event export
    pub fn funding_events_path(&self, exchange: &str) -> PathBuf {
        self.data_dir.join(format!("funding_events_{}.csv", exchange))
    }

    /// Path of a perpetual venue's daily candle export
    pub fn candles_path(&self, exchange: &str) -> PathBuf {
        self.data_dir.join(format!("candles_{}.csv", exchange))
    }

    /// Parse a perpetual funding table
    pub fn read_funding_table<R: Read>(exchange: &str, reader: R) -> Result<ExchangeDataset> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut dataset = ExchangeDataset::new(exchange);

        for record in csv_reader.deserialize::<FundingRow>() {
            let row = record.map_err(|e| {
                ArbitrageError::DataParsing(format!("{}: invalid funding row: {}", exchange, e))
            })?;
            dataset.insert(row.into_snapshot());
        }

        Ok(dataset)
    }

    /// Parse a spot pair table
    pub fn read_spot_pairs<R: Read>(exchange: &str, reader: R) -> Result<Vec<String>> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut pairs = Vec::new();

        for record in csv_reader.deserialize::<SpotRow>() {
            let row = record.map_err(|e| {
                ArbitrageError::DataParsing(format!("{}: invalid spot row: {}", exchange, e))
            })?;
            pairs.push(row.pair);
        }

        Ok(pairs)
    }

    /// Parse a funding event export, grouping events per pair in first-seen order
    pub fn read_funding_events<R: Read>(exchange: &str, reader: R) -> Result<IndexMap<String, Vec<FundingEvent>>> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut events: IndexMap<String, Vec<FundingEvent>> = IndexMap::new();

        for record in csv_reader.deserialize::<EventRow>() {
            let row = record.map_err(|e| {
                ArbitrageError::DataParsing(format!("{}: invalid funding event: {}", exchange, e))
            })?;
            events.entry(row.pair).or_default().push(FundingEvent {
                timestamp: row.timestamp,
                rate: row.rate.filter(|r| !r.is_nan()),
            });
        }

        Ok(events)
    }

    /// Parse a daily candle export, grouping candles per pair in time order
    pub fn read_candles<R: Read>(exchange: &str, reader: R) -> Result<HashMap<String, Vec<Candle>>> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut candles: HashMap<String, Vec<Candle>> = HashMap::new();

        for record in csv_reader.deserialize::<CandleRow>() {
            let row = record.map_err(|e| {
                ArbitrageError::DataParsing(format!("{}: invalid candle: {}", exchange, e))
            })?;
            let (pair, candle) = row.into_candle();
            candles.entry(pair).or_default().push(candle);
        }

        for series in candles.values_mut() {
            series.sort_by_key(|c| c.timestamp);
        }

        Ok(candles)
    }

    /// Assemble a dataset from raw exports.
    ///
    /// Every pair with events gets a snapshot. Pairs present in `candles` get amplitude
    /// statistics over the candles opened within the last `amplitude_days`; other pairs
    /// keep them unavailable.
    pub fn assemble_dataset(
        &self,
        exchange: &str,
        events: IndexMap<String, Vec<FundingEvent>>,
        candles: &HashMap<String, Vec<Candle>>,
    ) -> ExchangeDataset {
        let candle_cutoff = self.reference_ms - i64::from(self.amplitude_days) * MS_PER_DAY;
        let mut dataset = ExchangeDataset::new(exchange);

        for (pair, pair_events) in events {
            let history = FundingHistory::from_events(&pair_events, self.reference_ms);
            let mut snapshot = FundingSnapshot::new(pair).with_history(history);

            if let Some(series) = candles.get(&snapshot.pair) {
                let recent: Vec<Candle> = series.iter().filter(|c| c.timestamp >= candle_cutoff).copied().collect();
                snapshot = snapshot.with_amplitude(AmplitudeStats::from_candles(&recent));
            }

            dataset.insert(snapshot);
        }

        dataset
    }

    /// Load one perpetual venue. `Ok(None)` when neither its funding table nor its
    /// event export exists.
    pub fn load_perpetual(&self, exchange: &str) -> Result<Option<ExchangeDataset>> {
        let path = self.funding_rates_path(exchange);
        if let Some(file) = open_if_exists(&path)? {
            return Self::read_funding_table(exchange, file).map(Some);
        }

        let events_path = self.funding_events_path(exchange);
        let Some(events_file) = open_if_exists(&events_path)? else {
            warn!("No funding rates file for {} at {}", exchange, path.display());
            return Ok(None);
        };

        debug!("Building {} snapshots from {}", exchange, events_path.display());
        let events = Self::read_funding_events(exchange, events_file)?;
        let candles = match open_if_exists(&self.candles_path(exchange))? {
            Some(file) => Self::read_candles(exchange, file)?,
            None => HashMap::new(),
        };

        Ok(Some(self.assemble_dataset(exchange, events, &candles)))
    }

    /// Load every configured perpetual venue that has data.
    ///
    /// Fails with [`ArbitrageError::NoVenueData`] when none does.
    pub fn load_perpetual_datasets(&self, exchanges: &[String]) -> Result<Vec<ExchangeDataset>> {
        let mut datasets = Vec::new();

        for exchange in exchanges {
            match self.load_perpetual(exchange)? {
                Some(dataset) if !dataset.is_empty() => {
                    log_venue!(info, exchange, dataset.len(), "Perpetual data loaded");
                    metrics::record_venue_loaded(exchange, dataset.len());
                    datasets.push(dataset);
                }
                Some(_) => warn!("Funding rates file for {} has no rows", exchange),
                None => {}
            }
        }

        if datasets.is_empty() {
            return Err(ArbitrageError::NoVenueData(self.data_dir.display().to_string()).into());
        }

        let names: Vec<&str> = datasets.iter().map(ExchangeDataset::exchange).collect();
        info!("Data for perpetual exchanges ({}) loaded successfully", names.join(", "));

        Ok(datasets)
    }

    /// Aggregate the spot pairs of every configured spot venue that has data
    pub fn load_spot_availability(&self, exchanges: &[String]) -> Result<SpotAvailability> {
        let mut availability = SpotAvailability::new();

        for exchange in exchanges {
            let path = self.spot_pairs_path(exchange);
            let Some(file) = open_if_exists(&path)? else {
                warn!("No spot pairs file for {} at {}", exchange, path.display());
                continue;
            };

            let pairs = Self::read_spot_pairs(exchange, file)?;
            log_venue!(info, exchange, pairs.len(), "Spot pairs loaded");
            availability.add_exchange(exchange, pairs);
        }

        Ok(availability)
    }
}

fn open_if_exists(path: &Path) -> Result<Option<std::fs::File>> {
    match std::fs::File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ArbitrageError::Io(format!("Failed to open {}: {}", path.display(), e)).into()),
    }
}
