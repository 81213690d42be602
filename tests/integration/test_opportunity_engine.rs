//! Invariants of the opportunity computers over realistic venue data

use crate::TestUtils;
use funding_rate_arbitrage::{
    config::AnalysisConfig,
    strategy::{
        filter_and_sort, normalize, sort_perp_perp, PerpPerpComputer, RateSign, SpotPerpComputer, Window,
    },
    ExchangeDataset, SpotAvailability,
};

fn analysis(days: u32, threshold: f64) -> AnalysisConfig {
    AnalysisConfig {
        funding_historical_days: days,
        funding_rate_threshold: threshold,
        ..AnalysisConfig::default()
    }
}

fn live_venues() -> (ExchangeDataset, ExchangeDataset) {
    let a = ExchangeDataset::from_snapshots(
        "binance",
        vec![
            TestUtils::snapshot("BTCUSDT", Some(0.0002), TestUtils::hourly_series(0.05, 72)),
            TestUtils::snapshot("ETHUSDT", Some(0.0009), TestUtils::hourly_series(0.01, 72)),
            TestUtils::snapshot("1000PEPEUSDT", Some(0.0004), TestUtils::hourly_series(0.02, 72)),
            TestUtils::snapshot("ADAUSDT", Some(0.0001), TestUtils::hourly_series(0.02, 72)),
        ],
    );
    let b = ExchangeDataset::from_snapshots(
        "gate",
        vec![
            TestUtils::snapshot("BTCUSDT", Some(0.0005), TestUtils::hourly_series(0.03, 72)),
            TestUtils::snapshot("ETHUSDT", Some(0.0001), TestUtils::hourly_series(0.04, 72)),
            TestUtils::snapshot("PEPEUSDT", Some(0.0004), TestUtils::hourly_series(0.01, 72)),
            TestUtils::snapshot("SOLUSDT", Some(0.0003), TestUtils::hourly_series(0.02, 72)),
        ],
    );
    (a, b)
}

#[test]
fn test_three_day_example() {
    let (a, b) = live_venues();
    let result = PerpPerpComputer::new(&analysis(3, 0.01)).compute("binance", "gate", &a, &b);

    let btc = result.iter().find(|o| o.pair == "BTCUSDT").unwrap();
    assert_eq!(btc.short_exchange, "binance");
    assert_eq!(btc.long_exchange, "gate");
    assert!((btc.cumulative_rate_diff.get(Window::Main) - 0.02).abs() < 1e-9);
    assert_eq!(btc.apy_historical_average, 2.43);
}

#[test]
fn test_join_and_leg_invariants() {
    let (a, b) = live_venues();
    let result = PerpPerpComputer::new(&analysis(3, 0.01)).compute("binance", "gate", &a, &b);

    let pairs: Vec<_> = result.iter().map(|o| o.pair.as_str()).collect();
    assert_eq!(pairs, vec!["BTCUSDT", "ETHUSDT", "PEPEUSDT"]);

    for opp in &result {
        assert_ne!(opp.short_exchange, opp.long_exchange);
        assert!(["binance", "gate"].contains(&opp.short_exchange.as_str()));
        assert!(["binance", "gate"].contains(&opp.long_exchange.as_str()));

        let short = if opp.short_exchange == "binance" { &a } else { &b };
        let long = if opp.long_exchange == "binance" { &a } else { &b };
        let short_rate = short.get(&opp.pair).unwrap().current_rate.unwrap();
        let long_rate = long.get(&opp.pair).unwrap().current_rate.unwrap();
        assert!(short_rate <= long_rate);

        for window in Window::ALL {
            let short_sum: f64 = opp.short_historical_rates.get(window).iter().sum();
            let long_sum: f64 = opp.long_historical_rates.get(window).iter().sum();
            assert_eq!(opp.cumulative_rate_diff.get(window), short_sum - long_sum);
        }
    }
}

#[test]
fn test_perp_perp_ranking() {
    let (a, b) = live_venues();
    let ranked = sort_perp_perp(PerpPerpComputer::new(&analysis(3, 0.01)).compute("binance", "gate", &a, &b));

    let keys: Vec<f64> = ranked.iter().map(|o| o.cumulative_rate_diff.get(Window::Main)).collect();
    assert!(keys.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_disjoint_venues() {
    let a = ExchangeDataset::from_snapshots("binance", vec![TestUtils::snapshot("BTCUSDT", Some(0.01), vec![0.01])]);
    let b = ExchangeDataset::from_snapshots("okx", vec![TestUtils::snapshot("ETHUSDT", Some(0.01), vec![0.01])]);

    assert!(PerpPerpComputer::new(&analysis(30, 0.01)).compute("binance", "okx", &a, &b).is_empty());
}

#[test]
fn test_spot_perp_partition() {
    let perp = ExchangeDataset::from_snapshots(
        "bybit",
        vec![
            TestUtils::snapshot("BTC/USDT:USDT", Some(0.02), vec![0.01, 0.02]),
            TestUtils::snapshot("ETH/USDT:USDT", Some(-0.05), vec![-0.03]),
            TestUtils::snapshot("1000BONK/USDT:USDT", None, vec![0.04]),
            TestUtils::snapshot("SOL/USDT:USDT", Some(0.005), vec![0.1]),
            TestUtils::snapshot("XRP/USDT:USDT", Some(-0.2), vec![-0.1]),
        ],
    );
    let mut spot = SpotAvailability::new();
    spot.add_exchange("binance", ["BTC/USDT", "ETH/USDT", "BONK/USDT", "SOL/USDT", "XRP/USDT"]);
    spot.add_exchange("okx", ["ETH/USDT"]);

    let threshold = 0.01;
    let rows = SpotPerpComputer::new(&analysis(30, threshold)).compute("bybit", &perp, &spot);
    assert!(rows.iter().all(|o| o.rate.abs() > threshold));
    assert_eq!(rows.len(), 4);

    let positive = filter_and_sort(rows.clone(), RateSign::Positive);
    let negative = filter_and_sort(rows.clone(), RateSign::Negative);
    assert_eq!(positive.len() + negative.len(), rows.iter().filter(|o| o.rate != 0.0).count());

    let positive_pairs: Vec<_> = positive.iter().map(|o| o.pair.as_str()).collect();
    assert_eq!(positive_pairs, vec!["BONK/USDT:USDT", "BTC/USDT:USDT"]);

    let negative_pairs: Vec<_> = negative.iter().map(|o| o.pair.as_str()).collect();
    assert_eq!(negative_pairs, vec!["XRP/USDT:USDT", "ETH/USDT:USDT"]);
    assert_eq!(negative[1].spot_exchange, "binance/okx");
    assert!(negative.iter().all(|o| o.apy_historical_average > 0.0));
}

#[test]
fn test_normalize_idempotent() {
    for symbol in ["1000PEPEUSDT", "10000SATSUSDT", "BTCUSDT", "1INCHUSDT", "100100X", "10", "", "1000000MOGUSDT"] {
        let once = normalize(symbol);
        assert_eq!(normalize(&once), once, "{}", symbol);
    }
    assert_eq!(normalize("1000PEPEUSDT"), "PEPEUSDT");
    assert_eq!(normalize("10000SATSUSDT"), "SATSUSDT");
    assert_eq!(normalize("BTCUSDT"), "BTCUSDT");
}
