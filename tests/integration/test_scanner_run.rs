//! File-backed analysis runs

use crate::{TestUtils, VenueRow};
use funding_rate_arbitrage::{
    config::FileFormat,
    output::RunDirectory,
    strategy::{FundingScanner, ScanOutcome, ScanReport},
};
use tempfile::tempdir;

fn completed(outcome: ScanOutcome) -> ScanReport {
    match outcome {
        ScanOutcome::Completed(report) => report,
        ScanOutcome::Aborted { reason } => panic!("run aborted: {}", reason),
    }
}

fn seed_venues(data_dir: &std::path::Path) {
    TestUtils::write_funding_table(
        data_dir,
        "binance",
        &[
            VenueRow::new("BTC/USDT:USDT", Some(0.0002), &[0.02, 0.03]).with_amplitude(2.5, 6.0, 30),
            VenueRow::new("1000PEPE/USDT:USDT", Some(0.05), &[0.04, 0.06]),
            VenueRow::new("XRP/USDT:USDT", Some(-0.03), &[-0.02]),
        ],
    );
    TestUtils::write_funding_table(
        data_dir,
        "gate",
        &[
            VenueRow::new("BTC/USDT:USDT", Some(0.0005), &[0.01]).with_amplitude(3.0, 5.0, 29),
            VenueRow::new("PEPE/USDT:USDT", Some(0.01), &[0.02]),
            VenueRow::new("DOGE/USDT:USDT", Some(0.1), &[0.1]),
        ],
    );
    TestUtils::write_spot_table(data_dir, "binance", &["BTC/USDT", "PEPE/USDT", "XRP/USDT"]);
}

#[tokio::test]
async fn test_full_run_writes_ranked_results() {
    let dir = tempdir().unwrap();
    let config = TestUtils::create_test_config(dir.path(), &["binance", "gate", "bybit"], &["binance"]);
    let run_dir = RunDirectory::from_config(&config.output, None);
    seed_venues(&run_dir.data_dir());

    let report = completed(FundingScanner::new(config).run(&run_dir).await.unwrap());

    // bybit has no table and is skipped
    assert_eq!(report.statistics.venues_loaded, 2);
    assert_eq!(report.statistics.exchange_combinations, 1);
    assert_eq!(report.written.len(), 3);

    let perp_path = run_dir.result_dir().join("result_perp_perp_binance_gate_bybit.csv");
    let (headers, rows) = TestUtils::read_result_csv(&perp_path);
    assert_eq!(headers[0], "pair");
    assert!(headers.contains(&"cumulative_rate_diff_30d".to_string()));
    assert_eq!(rows.len(), 2);

    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    assert_eq!(&rows[0][column("pair")], "BTC/USDT:USDT");
    assert_eq!(&rows[0][column("short_exchange")], "binance");
    assert_eq!(&rows[0][column("long_exchange")], "gate");
    assert_eq!(&rows[0][column("mean_daily_amplitude")], "2.5");
    assert_eq!(&rows[0][column("amplitude_days")], "30");
    assert_eq!(&rows[1][column("pair")], "PEPE/USDT:USDT");
    assert_eq!(&rows[1][column("short_exchange")], "gate");

    let spot = report.spot_perp.unwrap();
    assert_eq!(spot.positive.len(), 1);
    assert_eq!(spot.positive[0].pair, "PEPE/USDT:USDT");
    assert_eq!(spot.negative.len(), 1);
    assert_eq!(spot.negative[0].pair, "XRP/USDT:USDT");
    assert_eq!(spot.negative[0].apy_historical_average, 0.24);

    let (headers, rows) =
        TestUtils::read_result_csv(&run_dir.result_dir().join("result_spot_perp_negative_binance_gate_bybit.csv"));
    assert_eq!(headers.last().map(String::as_str), Some("cum_sum_30d"));
    assert_eq!(&rows[0][headers.iter().position(|h| h == "historical_rates").unwrap()], "[-0.02]");
}

#[tokio::test]
async fn test_run_without_venue_data_aborts() {
    let dir = tempdir().unwrap();
    let config = TestUtils::create_test_config(dir.path(), &["binance", "gate"], &[]);
    let run_dir = RunDirectory::from_config(&config.output, None);

    let outcome = FundingScanner::new(config).run(&run_dir).await.unwrap();
    match outcome {
        ScanOutcome::Aborted { reason } => assert!(reason.contains("No perpetual exchange data")),
        ScanOutcome::Completed(_) => panic!("expected an aborted run"),
    }
    assert!(!run_dir.result_dir().exists());
}

#[tokio::test]
async fn test_no_shared_pairs_skips_perp_perp_file() {
    let dir = tempdir().unwrap();
    let config = TestUtils::create_test_config(dir.path(), &["binance", "okx"], &["binance"]);
    let run_dir = RunDirectory::from_config(&config.output, None);
    let data_dir = run_dir.data_dir();

    TestUtils::write_funding_table(&data_dir, "binance", &[VenueRow::new("BTCUSDT", None, &[0.001])]);
    TestUtils::write_funding_table(&data_dir, "okx", &[VenueRow::new("ETHUSDT", None, &[0.001])]);
    TestUtils::write_spot_table(&data_dir, "binance", &["SOL/USDT"]);

    let report = completed(FundingScanner::new(config).run(&run_dir).await.unwrap());

    assert_eq!(report.perp_perp.as_deref().map(<[_]>::len), Some(0));
    assert!(!run_dir.result_dir().join("result_perp_perp_binance_okx.csv").exists());

    // Spot reports are written even when empty
    assert_eq!(report.written.len(), 2);
    assert!(run_dir.result_dir().join("result_spot_perp_positive_binance_okx.csv").exists());
    assert!(run_dir.result_dir().join("result_spot_perp_negative_binance_okx.csv").exists());
}

#[tokio::test]
async fn test_json_results_under_date_folder() {
    let dir = tempdir().unwrap();
    let mut config = TestUtils::create_test_config(dir.path(), &["binance", "gate"], &[]);
    config.output.file_format = FileFormat::Json;
    let run_dir = RunDirectory::from_config(&config.output, Some("20240105"));
    assert!(run_dir.root().ends_with("20240105"));

    seed_venues(&run_dir.data_dir());
    let report = completed(FundingScanner::new(config).run(&run_dir).await.unwrap());
    assert_eq!(report.written.len(), 1);

    let content = std::fs::read_to_string(&report.written[0]).unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["pair"], "BTC/USDT:USDT");
    assert_eq!(records[0]["amplitude_days"], 30);
    assert!(records[1]["mean_daily_amplitude"].is_null());
}

#[tokio::test]
async fn test_run_from_raw_exports() {
    let dir = tempdir().unwrap();
    let config = TestUtils::create_test_config(dir.path(), &["binance", "gate"], &[]);
    let run_dir = RunDirectory::from_config(&config.output, None);
    let data_dir = run_dir.data_dir();
    std::fs::create_dir_all(&data_dir).unwrap();

    let hour = 60 * 60 * 1000;
    let now = chrono::Utc::now().timestamp_millis();
    std::fs::write(
        data_dir.join("funding_events_binance.csv"),
        format!(
            "pair,timestamp,rate\nBTC/USDT:USDT,{},0.0003\nBTC/USDT:USDT,{},0.0002\n",
            now - 2 * hour,
            now - hour
        ),
    )
    .unwrap();
    std::fs::write(
        data_dir.join("candles_binance.csv"),
        format!("pair,timestamp,open,high,low,close,volume\nBTC/USDT:USDT,{},100,104,100,102,5\n", now - 24 * hour),
    )
    .unwrap();
    std::fs::write(
        data_dir.join("funding_events_gate.csv"),
        format!("pair,timestamp,rate\nBTC/USDT:USDT,{},0.0001\n", now - hour),
    )
    .unwrap();

    let report = completed(FundingScanner::new(config).run(&run_dir).await.unwrap());
    assert_eq!(report.statistics.venues_loaded, 2);

    let opportunities = report.perp_perp.unwrap();
    assert_eq!(opportunities.len(), 1);
    let btc = &opportunities[0];
    assert_eq!(btc.short_exchange, "binance");
    assert_eq!(btc.short_historical_rates.days_3, vec![0.0003, 0.0002]);
    assert_eq!(btc.amplitude.amplitude_days, Some(1));

    let (headers, rows) =
        TestUtils::read_result_csv(&run_dir.result_dir().join("result_perp_perp_binance_gate.csv"));
    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    assert_eq!(&rows[0][column("mean_daily_amplitude")], "4");
    assert_eq!(&rows[0][column("amplitude_days")], "1");
}
