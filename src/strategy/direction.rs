//! Short/long venue assignment for perpetual-perpetual opportunities

use crate::data::{ExchangeDataset, FundingSnapshot};

/// Which side of a venue pair (A, B) holds the short leg
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Short on venue A, long on venue B
    #[default]
    ShortA,
    /// Short on venue B, long on venue A
    ShortB,
}

impl Direction {
    /// Order `(a, b)` as `(short, long)`
    pub fn arrange<T>(self, a: T, b: T) -> (T, T) {
        match self {
            Direction::ShortA => (a, b),
            Direction::ShortB => (b, a),
        }
    }
}

/// Decides which venue of a joined pair takes the short leg
pub trait AssignDirection {
    /// `raw_diff` is `sum(A.main) - sum(B.main)` for the pair
    fn assign(&self, a: &FundingSnapshot, b: &FundingSnapshot, raw_diff: f64) -> Direction;
}

/// Both venues report live rates: the venue with the smaller current rate is short
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveRateMode;

impl AssignDirection for LiveRateMode {
    fn assign(&self, a: &FundingSnapshot, b: &FundingSnapshot, _raw_diff: f64) -> Direction {
        match (a.current_rate, b.current_rate) {
            (Some(rate_a), Some(rate_b)) if rate_b < rate_a => Direction::ShortB,
            _ => Direction::default(),
        }
    }
}

/// No live rates: the sign of the historical differential decides
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoricalFallbackMode;

impl AssignDirection for HistoricalFallbackMode {
    fn assign(&self, _a: &FundingSnapshot, _b: &FundingSnapshot, raw_diff: f64) -> Direction {
        if raw_diff < 0.0 {
            Direction::ShortB
        } else {
            Direction::default()
        }
    }
}

/// Assignment strategy chosen once per venue combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionMode {
    /// See [`LiveRateMode`]
    LiveRate,
    /// See [`HistoricalFallbackMode`]
    HistoricalFallback,
}

impl DirectionMode {
    /// Live-rate mode when both venues carry current rates
    pub fn select(a: &ExchangeDataset, b: &ExchangeDataset) -> Self {
        if a.has_current_rates() && b.has_current_rates() {
            DirectionMode::LiveRate
        } else {
            DirectionMode::HistoricalFallback
        }
    }
}

impl AssignDirection for DirectionMode {
    fn assign(&self, a: &FundingSnapshot, b: &FundingSnapshot, raw_diff: f64) -> Direction {
        match self {
            DirectionMode::LiveRate => LiveRateMode.assign(a, b, raw_diff),
            DirectionMode::HistoricalFallback => HistoricalFallbackMode.assign(a, b, raw_diff),
        }
    }
}
