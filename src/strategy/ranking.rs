//! Ordering of computed opportunities
//!
//! All sorts are stable, so rows with equal keys keep their emission order.

use super::{PerpPerpOpportunity, SpotPerpOpportunity};
use crate::utils::{cmp_asc_nan_last, cmp_desc_nan_last};

/// Which side of the funding sign a spot-perp report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSign {
    /// Perpetual pays longs: short perp, buy spot
    Positive,
    /// Perpetual pays shorts: long perp, borrow spot
    Negative,
}

impl RateSign {
    /// File name tag
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSign::Positive => "positive",
            RateSign::Negative => "negative",
        }
    }
}

/// Keep rows whose rate has the requested sign and rank them by rate.
///
/// Positive rows are sorted by rate descending. Negative rows have their APY negated,
/// so it reads as a positive magnitude, and are sorted by rate ascending.
pub fn filter_and_sort(opportunities: Vec<SpotPerpOpportunity>, sign: RateSign) -> Vec<SpotPerpOpportunity> {
    match sign {
        RateSign::Positive => {
            let mut rows: Vec<_> = opportunities.into_iter().filter(|o| o.rate > 0.0).collect();
            rows.sort_by(|a, b| cmp_desc_nan_last(a.rate, b.rate));
            rows
        }
        RateSign::Negative => {
            let mut rows: Vec<_> = opportunities
                .into_iter()
                .filter(|o| o.rate < 0.0)
                .map(|mut o| {
                    o.apy_historical_average = -o.apy_historical_average;
                    o
                })
                .collect();
            rows.sort_by(|a, b| cmp_asc_nan_last(a.rate, b.rate));
            rows
        }
    }
}

/// Rank perpetual-perpetual rows by main-window cumulative diff, descending.
///
/// Every row is ranked on the diff, so a row whose diff is NaN goes last.
pub fn sort_perp_perp(mut opportunities: Vec<PerpPerpOpportunity>) -> Vec<PerpPerpOpportunity> {
    opportunities.sort_by(|a, b| cmp_desc_nan_last(a.cumulative_rate_diff.main, b.cumulative_rate_diff.main));
    opportunities
}
