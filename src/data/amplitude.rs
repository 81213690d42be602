//! Daily amplitude statistics, a volatility proxy for each pair

use crate::utils::round2;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Daily OHLCV candle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in milliseconds since the epoch
    pub timestamp: i64,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl Candle {
    /// Intraday range as a percentage of the open price
    pub fn amplitude(&self) -> f64 {
        100.0 * (self.high - self.low) / self.open
    }
}

/// Mean and max daily amplitude over the candles actually available
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeStats {
    /// Mean daily amplitude in percent, NaN when unavailable
    pub mean_daily_amplitude: f64,
    /// Max daily amplitude in percent, NaN when unavailable
    pub max_daily_amplitude: f64,
    /// Number of daily candles the statistics were computed from
    pub amplitude_days: u32,
}

impl AmplitudeStats {
    /// Statistics for a pair without candle data
    pub fn unavailable() -> Self {
        Self {
            mean_daily_amplitude: f64::NAN,
            max_daily_amplitude: f64::NAN,
            amplitude_days: 0,
        }
    }

    /// Compute from daily candles; values rounded to two decimals
    pub fn from_candles(candles: &[Candle]) -> Self {
        if candles.is_empty() {
            return Self::unavailable();
        }

        let amplitudes: Vec<f64> = candles.iter().map(Candle::amplitude).collect();

        Self {
            mean_daily_amplitude: round2(Statistics::<f64>::mean(amplitudes.iter())),
            max_daily_amplitude: round2(Statistics::<f64>::max(amplitudes.iter())),
            amplitude_days: candles.len() as u32,
        }
    }
}
