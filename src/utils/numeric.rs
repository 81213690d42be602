//! Numeric helpers shared by the opportunity computers

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

/// Days per year used for annualization
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Round to two decimal places the way numpy does: scale by 100, round half to even on
/// the binary product, scale back. Non-finite values pass through.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scaled = value * 100.0;
    Decimal::from_f64_retain(scaled)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .map_or(value, |rounded| rounded / 100.0)
}

/// Annualized yield of a cumulative funding sum collected over `window_days`
pub fn annualize(cumulative: f64, window_days: u32) -> f64 {
    round2(DAYS_PER_YEAR * cumulative / window_days as f64)
}

/// Sum of a rate series; empty series sum to zero
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Descending order with NaN placed last
pub fn cmp_desc_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Ascending order with NaN placed last
pub fn cmp_asc_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
