//! Integration tests for the funding rate scanner

mod test_opportunity_engine;
mod test_scanner_run;

use funding_rate_arbitrage::{
    config::{FileFormat, ScannerConfig},
    data::FundingHistory,
    FundingSnapshot,
};
use std::path::Path;

/// One perpetual row written to a venue table
pub struct VenueRow<'a> {
    pub pair: &'a str,
    pub rate: Option<f64>,
    pub history: Vec<f64>,
    pub amplitude: Option<(f64, f64, u32)>,
}

impl<'a> VenueRow<'a> {
    pub fn new(pair: &'a str, rate: Option<f64>, history: &[f64]) -> Self {
        Self {
            pair,
            rate,
            history: history.to_vec(),
            amplitude: None,
        }
    }

    pub fn with_amplitude(mut self, mean: f64, max: f64, days: u32) -> Self {
        self.amplitude = Some((mean, max, days));
        self
    }
}

/// Test utilities for integration tests
pub struct TestUtils;

impl TestUtils {
    /// Configuration rooted at `directory` without a date level
    pub fn create_test_config(directory: &Path, perpetual: &[&str], spot: &[&str]) -> ScannerConfig {
        let mut config = ScannerConfig::default();
        config.exchanges.perpetual = perpetual.iter().map(|e| e.to_string()).collect();
        config.exchanges.spot = spot.iter().map(|e| e.to_string()).collect();
        config.analysis.get_spot_perp_opportunities = !spot.is_empty();
        config.output.directory = directory.display().to_string();
        config.output.use_date_subfolder = false;
        config.output.file_format = FileFormat::Csv;
        config
    }

    /// `len` equal samples summing to `total`
    pub fn hourly_series(total: f64, len: usize) -> Vec<f64> {
        vec![total / len as f64; len]
    }

    /// Snapshot with the same series in every window
    pub fn snapshot(pair: &str, rate: Option<f64>, history: Vec<f64>) -> FundingSnapshot {
        FundingSnapshot::new(pair).with_current_rate(rate).with_history(FundingHistory {
            historical_rates: history.clone(),
            historical_rates_7d: history.clone(),
            historical_rates_3d: history,
        })
    }

    /// Write `funding_rates_{exchange}.csv`
    pub fn write_funding_table(data_dir: &Path, exchange: &str, rows: &[VenueRow<'_>]) {
        std::fs::create_dir_all(data_dir).unwrap();
        let mut writer = csv::Writer::from_path(data_dir.join(format!("funding_rates_{}.csv", exchange))).unwrap();
        writer
            .write_record([
                "pair",
                "rate",
                "historical_rates",
                "historical_rates_7d",
                "historical_rates_3d",
                "mean_daily_amplitude",
                "max_daily_amplitude",
                "amplitude_days",
            ])
            .unwrap();

        for row in rows {
            let series = serde_json::to_string(&row.history).unwrap();
            let (mean, max, days) = match row.amplitude {
                Some((mean, max, days)) => (mean.to_string(), max.to_string(), days.to_string()),
                None => (String::new(), String::new(), String::new()),
            };
            writer
                .write_record([
                    row.pair.to_string(),
                    row.rate.map(|r| r.to_string()).unwrap_or_default(),
                    series.clone(),
                    series.clone(),
                    series,
                    mean,
                    max,
                    days,
                ])
                .unwrap();
        }
        writer.flush().unwrap();
    }

    /// Write `spot_pairs_{exchange}.csv`
    pub fn write_spot_table(data_dir: &Path, exchange: &str, pairs: &[&str]) {
        std::fs::create_dir_all(data_dir).unwrap();
        let mut content = String::from("pair\n");
        for pair in pairs {
            content.push_str(pair);
            content.push('\n');
        }
        std::fs::write(data_dir.join(format!("spot_pairs_{}.csv", exchange)), content).unwrap();
    }

    /// Read a result CSV as header-keyed records
    pub fn read_result_csv(path: &Path) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().iter().map(String::from).collect();
        let records = reader.records().map(|r| r.unwrap()).collect();
        (headers, records)
    }
}
