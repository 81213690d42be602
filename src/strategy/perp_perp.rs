//! Perpetual-perpetual funding spread opportunities
//!
//! For two venues the computer inner-joins their datasets on normalized pair, measures the
//! cumulative funding collected by each side over the main, 7-day and 3-day windows, picks
//! the short and long venue, and reconciles the two venues' amplitude statistics.

use super::direction::{AssignDirection, DirectionMode};
use crate::config::AnalysisConfig;
use crate::data::{ExchangeDataset, FundingSnapshot};
use crate::utils::{annualize, metrics, sum};
use std::ops::Sub;
use tracing::debug;

/// Accumulation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Configured `funding_historical_days` window
    Main,
    /// Last 7 days
    Days7,
    /// Last 3 days
    Days3,
}

impl Window {
    /// All windows, main first
    pub const ALL: [Window; 3] = [Window::Main, Window::Days7, Window::Days3];
}

/// One venue's historical series for every window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSeries {
    /// Main window
    pub main: Vec<f64>,
    /// 7-day window
    pub days_7: Vec<f64>,
    /// 3-day window
    pub days_3: Vec<f64>,
}

impl WindowSeries {
    fn of(snapshot: &FundingSnapshot) -> Self {
        Self {
            main: snapshot.historical_rates.clone(),
            days_7: snapshot.historical_rates_7d.clone(),
            days_3: snapshot.historical_rates_3d.clone(),
        }
    }

    /// Series for `window`
    pub fn get(&self, window: Window) -> &[f64] {
        match window {
            Window::Main => &self.main,
            Window::Days7 => &self.days_7,
            Window::Days3 => &self.days_3,
        }
    }

    /// Cumulative rate per window
    pub fn totals(&self) -> WindowTotals {
        WindowTotals {
            main: sum(&self.main),
            days_7: sum(&self.days_7),
            days_3: sum(&self.days_3),
        }
    }
}

/// A scalar per window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowTotals {
    /// Main window
    pub main: f64,
    /// 7-day window
    pub days_7: f64,
    /// 3-day window
    pub days_3: f64,
}

impl WindowTotals {
    /// Value for `window`
    pub fn get(&self, window: Window) -> f64 {
        match window {
            Window::Main => self.main,
            Window::Days7 => self.days_7,
            Window::Days3 => self.days_3,
        }
    }
}

impl Sub for WindowTotals {
    type Output = WindowTotals;

    fn sub(self, rhs: WindowTotals) -> WindowTotals {
        WindowTotals {
            main: self.main - rhs.main,
            days_7: self.days_7 - rhs.days_7,
            days_3: self.days_3 - rhs.days_3,
        }
    }
}

/// Amplitude statistics chosen for a venue pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconciledAmplitude {
    /// Mean daily amplitude in percent
    pub mean_daily_amplitude: f64,
    /// Max daily amplitude in percent
    pub max_daily_amplitude: f64,
    /// Candle count behind the figures
    pub amplitude_days: Option<u32>,
}

/// Combine two venues' amplitude statistics.
///
/// The venue with strictly more candle days wins wholesale. Otherwise each figure is the
/// larger of the two (a missing figure yields to the present one) and the day count is A's.
pub fn reconcile_amplitude(a: &FundingSnapshot, b: &FundingSnapshot) -> ReconciledAmplitude {
    let take = |s: &FundingSnapshot| ReconciledAmplitude {
        mean_daily_amplitude: s.mean_daily_amplitude,
        max_daily_amplitude: s.max_daily_amplitude,
        amplitude_days: s.amplitude_days,
    };

    match (a.amplitude_days, b.amplitude_days) {
        (Some(days_a), Some(days_b)) if days_a > days_b => take(a),
        (Some(days_a), Some(days_b)) if days_b > days_a => take(b),
        _ => ReconciledAmplitude {
            mean_daily_amplitude: a.mean_daily_amplitude.max(b.mean_daily_amplitude),
            max_daily_amplitude: a.max_daily_amplitude.max(b.max_daily_amplitude),
            amplitude_days: a.amplitude_days,
        },
    }
}

/// Funding spread between two perpetual venues for one pair
#[derive(Debug, Clone, PartialEq)]
pub struct PerpPerpOpportunity {
    /// Normalized pair
    pub pair: String,
    /// `365 × (sum(A.main) − sum(B.main)) / main_days`, two decimals
    pub apy_historical_average: f64,
    /// Venue to open the short leg on
    pub short_exchange: String,
    /// Venue to open the long leg on
    pub long_exchange: String,
    /// Reconciled amplitude statistics
    pub amplitude: ReconciledAmplitude,
    /// Short venue cumulative rate per window
    pub short_cumulative_rate: WindowTotals,
    /// Long venue cumulative rate per window
    pub long_cumulative_rate: WindowTotals,
    /// Short venue series per window
    pub short_historical_rates: WindowSeries,
    /// Long venue series per window
    pub long_historical_rates: WindowSeries,
    /// `short − long` cumulative rate per window
    pub cumulative_rate_diff: WindowTotals,
}

/// Computes perpetual-perpetual opportunities for one venue combination
#[derive(Debug, Clone)]
pub struct PerpPerpComputer {
    funding_historical_days: u32,
}

impl PerpPerpComputer {
    /// Create a computer for the configured main window
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            funding_historical_days: config.funding_historical_days,
        }
    }

    /// Main window length in days
    pub fn main_days(&self) -> u32 {
        self.funding_historical_days
    }

    /// Join the two venues and emit one opportunity per shared pair, in dataset A's order
    pub fn compute(
        &self,
        exchange_a: &str,
        exchange_b: &str,
        dataset_a: &ExchangeDataset,
        dataset_b: &ExchangeDataset,
    ) -> Vec<PerpPerpOpportunity> {
        let mode = DirectionMode::select(dataset_a, dataset_b);
        debug!("{} vs {}: direction mode {:?}", exchange_a, exchange_b, mode);

        let opportunities: Vec<_> = dataset_a
            .iter()
            .filter_map(|a| {
                dataset_b
                    .get(&a.normalized_pair)
                    .map(|b| self.build_opportunity(&mode, exchange_a, exchange_b, a, b))
            })
            .collect();

        metrics::record_joined_pairs(exchange_a, exchange_b, opportunities.len());
        opportunities
    }

    fn build_opportunity(
        &self,
        mode: &impl AssignDirection,
        exchange_a: &str,
        exchange_b: &str,
        a: &FundingSnapshot,
        b: &FundingSnapshot,
    ) -> PerpPerpOpportunity {
        let raw_diff = sum(&a.historical_rates) - sum(&b.historical_rates);
        let direction = mode.assign(a, b, raw_diff);

        let (short_exchange, long_exchange) = direction.arrange(exchange_a, exchange_b);
        let (short_snapshot, long_snapshot) = direction.arrange(a, b);

        let short_historical_rates = WindowSeries::of(short_snapshot);
        let long_historical_rates = WindowSeries::of(long_snapshot);
        let short_cumulative_rate = short_historical_rates.totals();
        let long_cumulative_rate = long_historical_rates.totals();

        PerpPerpOpportunity {
            pair: a.normalized_pair.clone(),
            apy_historical_average: annualize(raw_diff, self.funding_historical_days),
            short_exchange: short_exchange.to_string(),
            long_exchange: long_exchange.to_string(),
            amplitude: reconcile_amplitude(a, b),
            short_cumulative_rate,
            long_cumulative_rate,
            short_historical_rates,
            long_historical_rates,
            cumulative_rate_diff: short_cumulative_rate - long_cumulative_rate,
        }
    }
}
