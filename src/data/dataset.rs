//! In-memory per-venue tables

use super::{AmplitudeStats, FundingHistory};
use crate::strategy::normalizer::{base_pair, normalize};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Funding and amplitude snapshot of one perpetual pair on one venue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingSnapshot {
    /// Venue-native symbol
    pub pair: String,
    /// Venue-agnostic join key
    pub normalized_pair: String,
    /// Live funding rate, absent when current rates were not fetched
    pub current_rate: Option<f64>,
    /// Main-window hourly series, oldest first
    pub historical_rates: Vec<f64>,
    /// Time-filtered 7-day series
    pub historical_rates_7d: Vec<f64>,
    /// Time-filtered 3-day series
    pub historical_rates_3d: Vec<f64>,
    /// Mean daily amplitude in percent, NaN when unavailable
    pub mean_daily_amplitude: f64,
    /// Max daily amplitude in percent, NaN when unavailable
    pub max_daily_amplitude: f64,
    /// Candles behind the amplitude statistics
    pub amplitude_days: Option<u32>,
}

impl FundingSnapshot {
    /// Create a snapshot with no rates and unavailable amplitude
    pub fn new(pair: impl Into<String>) -> Self {
        let pair = pair.into();
        Self {
            normalized_pair: normalize(&pair),
            pair,
            current_rate: None,
            historical_rates: Vec::new(),
            historical_rates_7d: Vec::new(),
            historical_rates_3d: Vec::new(),
            mean_daily_amplitude: f64::NAN,
            max_daily_amplitude: f64::NAN,
            amplitude_days: None,
        }
    }

    /// Set the live funding rate
    pub fn with_current_rate(mut self, rate: Option<f64>) -> Self {
        self.current_rate = rate;
        self
    }

    /// Set all three historical windows
    pub fn with_history(mut self, history: FundingHistory) -> Self {
        self.historical_rates = history.historical_rates;
        self.historical_rates_7d = history.historical_rates_7d;
        self.historical_rates_3d = history.historical_rates_3d;
        self
    }

    /// Set the amplitude statistics
    pub fn with_amplitude(mut self, stats: AmplitudeStats) -> Self {
        self.mean_daily_amplitude = stats.mean_daily_amplitude;
        self.max_daily_amplitude = stats.max_daily_amplitude;
        self.amplitude_days = Some(stats.amplitude_days);
        self
    }

    /// Key used to match this perpetual against spot listings
    pub fn spot_key(&self) -> &str {
        base_pair(&self.normalized_pair)
    }

    /// Most recent historical rate
    pub fn last_historical_rate(&self) -> Option<f64> {
        self.historical_rates.last().copied()
    }
}

/// All perpetual snapshots of one venue, keyed by normalized pair in load order
#[derive(Debug, Clone, Default)]
pub struct ExchangeDataset {
    exchange: String,
    rows: IndexMap<String, FundingSnapshot>,
}

impl ExchangeDataset {
    /// Create an empty dataset
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            rows: IndexMap::new(),
        }
    }

    /// Build from snapshots; later duplicates of a normalized pair are dropped
    pub fn from_snapshots<I>(exchange: impl Into<String>, snapshots: I) -> Self
    where
        I: IntoIterator<Item = FundingSnapshot>,
    {
        let mut dataset = Self::new(exchange);
        for snapshot in snapshots {
            dataset.insert(snapshot);
        }
        dataset
    }

    /// Insert a snapshot. Returns false if its normalized pair is already present.
    pub fn insert(&mut self, snapshot: FundingSnapshot) -> bool {
        if let Some(existing) = self.rows.get(&snapshot.normalized_pair) {
            warn!(
                "{}: {} normalizes to {} already held by {}, keeping the first",
                self.exchange, snapshot.pair, snapshot.normalized_pair, existing.pair
            );
            return false;
        }
        self.rows.insert(snapshot.normalized_pair.clone(), snapshot);
        true
    }

    /// Venue identifier
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Look up a snapshot by normalized pair
    pub fn get(&self, normalized_pair: &str) -> Option<&FundingSnapshot> {
        self.rows.get(normalized_pair)
    }

    /// Snapshots in load order
    pub fn iter(&self) -> impl Iterator<Item = &FundingSnapshot> {
        self.rows.values()
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the venue has no pairs
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when the venue reports live current rates
    pub fn has_current_rates(&self) -> bool {
        self.rows.values().any(|s| s.current_rate.is_some())
    }
}

/// Spot pair to the spot venues listing it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotAvailability {
    pairs: BTreeMap<String, Vec<String>>,
}

impl SpotAvailability {
    /// Separator used when rendering the venue list
    pub const SEPARATOR: &'static str = "/";

    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the spot pairs listed by one venue
    pub fn add_exchange<I, S>(&mut self, exchange: &str, pairs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pair in pairs {
            let venues = self.pairs.entry(pair.into()).or_default();
            if !venues.iter().any(|v| v == exchange) {
                venues.push(exchange.to_string());
            }
        }
    }

    /// Venues listing `pair`, in registration order
    pub fn exchanges(&self, pair: &str) -> Option<&[String]> {
        self.pairs.get(pair).map(Vec::as_slice)
    }

    /// Venues listing `pair` joined with [`Self::SEPARATOR`]
    pub fn joined_exchanges(&self, pair: &str) -> Option<String> {
        self.exchanges(pair).map(|venues| venues.join(Self::SEPARATOR))
    }

    /// Number of distinct spot pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no spot pair is known
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
