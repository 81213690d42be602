//! Spot-perpetual funding opportunities
//!
//! A perpetual whose funding rate clears the threshold can be hedged with the same asset
//! on any spot venue that lists it.

use crate::config::AnalysisConfig;
use crate::data::{ExchangeDataset, FundingSnapshot, SpotAvailability};
use crate::utils::{annualize, sum};

/// Perpetual venue funding matched with spot listings
#[derive(Debug, Clone, PartialEq)]
pub struct SpotPerpOpportunity {
    /// Normalized perpetual pair
    pub pair: String,
    /// Current funding rate, approximated from history when not reported
    pub rate: f64,
    /// `365 × sum(historical_rates) / main_days`, two decimals
    pub apy_historical_average: f64,
    /// Perpetual venue
    pub perp_exchange: String,
    /// Spot venues listing the base pair, `/`-joined
    pub spot_exchange: String,
    /// Mean daily amplitude in percent
    pub mean_daily_amplitude: f64,
    /// Max daily amplitude in percent
    pub max_daily_amplitude: f64,
    /// Candle count behind the amplitude figures
    pub amplitude_days: Option<u32>,
    /// Main-window series
    pub historical_rates: Vec<f64>,
    /// Sum of the last `main_days × 24` samples
    pub cum_sum_main: f64,
}

/// Live rate, else the most recent historical rate, else zero
pub fn effective_rate(snapshot: &FundingSnapshot) -> f64 {
    snapshot
        .current_rate
        .or_else(|| snapshot.last_historical_rate())
        .unwrap_or(0.0)
}

/// Sum of the trailing `days × 24` hourly samples; all samples when fewer exist
pub fn sum_last_n_days(values: &[f64], days: u32) -> f64 {
    let Some(hours) = (days as usize).checked_mul(24) else {
        return 0.0;
    };
    sum(&values[values.len().saturating_sub(hours)..])
}

/// Computes spot-perpetual opportunities for one perpetual venue
#[derive(Debug, Clone)]
pub struct SpotPerpComputer {
    funding_historical_days: u32,
    funding_rate_threshold: f64,
}

impl SpotPerpComputer {
    /// Create a computer from the analysis configuration
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            funding_historical_days: config.funding_historical_days,
            funding_rate_threshold: config.funding_rate_threshold,
        }
    }

    /// Main window length in days
    pub fn main_days(&self) -> u32 {
        self.funding_historical_days
    }

    /// Filter by rate magnitude and join against spot listings, preserving perpetual order
    pub fn compute(
        &self,
        perp_exchange: &str,
        perp_dataset: &ExchangeDataset,
        spot_availability: &SpotAvailability,
    ) -> Vec<SpotPerpOpportunity> {
        perp_dataset
            .iter()
            .filter_map(|snapshot| {
                let rate = effective_rate(snapshot);
                if rate.is_nan() || rate.abs() <= self.funding_rate_threshold {
                    return None;
                }

                let spot_exchange = spot_availability.joined_exchanges(snapshot.spot_key())?;
                Some(self.build_opportunity(perp_exchange, snapshot, rate, spot_exchange))
            })
            .collect()
    }

    fn build_opportunity(
        &self,
        perp_exchange: &str,
        snapshot: &FundingSnapshot,
        rate: f64,
        spot_exchange: String,
    ) -> SpotPerpOpportunity {
        SpotPerpOpportunity {
            pair: snapshot.normalized_pair.clone(),
            rate,
            apy_historical_average: annualize(sum(&snapshot.historical_rates), self.funding_historical_days),
            perp_exchange: perp_exchange.to_string(),
            spot_exchange,
            mean_daily_amplitude: snapshot.mean_daily_amplitude,
            max_daily_amplitude: snapshot.max_daily_amplitude,
            amplitude_days: snapshot.amplitude_days,
            historical_rates: snapshot.historical_rates.clone(),
            cum_sum_main: sum_last_n_days(&snapshot.historical_rates, self.funding_historical_days),
        }
    }
}
