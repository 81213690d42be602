//! Run counters published through the `metrics` facade
//!
//! Nothing is exported unless the embedding binary installs a recorder.

/// Pairs held by a loaded perpetual venue
pub const VENUE_PAIRS: &str = "funding_scanner_venue_pairs";

/// Pairs present on both venues of a combination
pub const JOINED_PAIRS: &str = "funding_scanner_joined_pairs_total";

/// Opportunities emitted, labeled by kind
pub const OPPORTUNITIES: &str = "funding_scanner_opportunities_total";

/// Analysis runs aborted for lack of venue data
pub const ABORTED_RUNS: &str = "funding_scanner_aborted_runs_total";

/// Record a loaded perpetual venue
pub fn record_venue_loaded(exchange: &str, pairs: usize) {
    metrics::gauge!(VENUE_PAIRS, pairs as f64, "exchange" => exchange.to_string());
}

/// Record the join size of one exchange combination
pub fn record_joined_pairs(exchange_a: &str, exchange_b: &str, joined: usize) {
    metrics::counter!(
        JOINED_PAIRS,
        joined as u64,
        "exchange_a" => exchange_a.to_string(),
        "exchange_b" => exchange_b.to_string()
    );
}

/// Record emitted opportunities of one kind
pub fn record_opportunities(kind: &'static str, count: usize) {
    metrics::counter!(OPPORTUNITIES, count as u64, "kind" => kind);
}

/// Record an aborted run
pub fn record_aborted_run() {
    metrics::increment_counter!(ABORTED_RUNS);
}
