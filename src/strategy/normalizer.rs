//! Trading-pair normalization across venues

/// Strip leading quantity multipliers such as `10`, `100` or `1000`.
///
/// `1000PEPE/USDT:USDT` becomes `PEPE/USDT:USDT`; `1INCH/USDT:USDT` is left alone.
/// Stripping repeats until no multiplier prefix remains, so the result is a fixed point.
pub fn normalize(raw_pair: &str) -> String {
    let mut pair = raw_pair;
    while let Some(stripped) = strip_multiplier(pair) {
        pair = stripped;
    }
    pair.to_string()
}

fn strip_multiplier(pair: &str) -> Option<&str> {
    let rest = pair.strip_prefix('1')?;
    let stripped = rest.trim_start_matches('0');
    (stripped.len() < rest.len()).then_some(stripped)
}

/// Spot-comparable base of a perpetual symbol: everything before the settlement delimiter
pub fn base_pair(pair: &str) -> &str {
    pair.split_once(':').map_or(pair, |(base, _)| base)
}
