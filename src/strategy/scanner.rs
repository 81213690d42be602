//! Analysis run orchestration
//!
//! Every venue combination (perp-perp) and every perpetual venue (spot-perp) is an
//! independent unit of work. Each runs as a blocking task over shared immutable datasets;
//! results are joined in configured order, merged, then ranked.

use super::perp_perp::{PerpPerpComputer, PerpPerpOpportunity};
use super::ranking::{filter_and_sort, sort_perp_perp, RateSign};
use super::spot_perp::{SpotPerpComputer, SpotPerpOpportunity};
use crate::config::ScannerConfig;
use crate::data::{DatasetLoader, ExchangeDataset, SpotAvailability};
use crate::output::{result_filename, ResultKind, ResultTable, ResultWriter, RunDirectory};
use crate::{log_opportunity, utils::metrics, ArbitrageError, Result};
use futures_util::future::join_all;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Counters describing one analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStatistics {
    /// Perpetual venues with data
    pub venues_loaded: usize,
    /// Venue combinations analyzed
    pub exchange_combinations: usize,
    /// Perpetual-perpetual rows
    pub perp_perp_opportunities: usize,
    /// Spot-perpetual rows with positive funding
    pub spot_perp_positive: usize,
    /// Spot-perpetual rows with negative funding
    pub spot_perp_negative: usize,
    /// Wall time of the analysis
    pub elapsed_ms: u64,
}

/// Ranked spot-perpetual rows split by funding sign
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotPerpResults {
    /// Positive funding, rate descending
    pub positive: Vec<SpotPerpOpportunity>,
    /// Negative funding, rate ascending, APY negated
    pub negative: Vec<SpotPerpOpportunity>,
}

/// Everything one analysis produced
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Ranked perp-perp rows; `None` when the analysis was disabled or skipped
    pub perp_perp: Option<Vec<PerpPerpOpportunity>>,
    /// Spot-perp rows; `None` when the analysis was disabled or skipped
    pub spot_perp: Option<SpotPerpResults>,
    /// Run counters
    pub statistics: ScanStatistics,
    /// Result files written
    pub written: Vec<PathBuf>,
}

/// Outcome of a file-backed run
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// Analysis ran
    Completed(ScanReport),
    /// No perpetual venue had data; nothing was analyzed
    Aborted {
        /// Human-readable cause
        reason: String,
    },
}

/// Runs the configured analyses
#[derive(Debug, Clone)]
pub struct FundingScanner {
    config: ScannerConfig,
}

impl FundingScanner {
    /// Create a scanner
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Analyze already-loaded venue data.
    ///
    /// `datasets` must be in configured venue order; combinations follow that order.
    pub async fn analyze(
        &self,
        datasets: Vec<ExchangeDataset>,
        spot: Option<SpotAvailability>,
    ) -> Result<ScanReport> {
        let started = Instant::now();
        let analysis = &self.config.analysis;
        let datasets: Vec<Arc<ExchangeDataset>> = datasets.into_iter().map(Arc::new).collect();

        let mut report = ScanReport::default();
        report.statistics.venues_loaded = datasets.len();

        if analysis.get_perp_perp_opportunities {
            info!("Analyzing Perpetual-Perpetual opportunities");
            if datasets.len() < 2 {
                warn!("Skipping Perpetual-Perpetual analysis: at least 2 perpetual exchanges with data are needed");
            } else {
                let opportunities = self.scan_perp_perp(&datasets, &mut report.statistics).await?;
                report.statistics.perp_perp_opportunities = opportunities.len();
                report.perp_perp = Some(opportunities);
            }
        }

        if analysis.get_spot_perp_opportunities {
            info!("Analyzing Spot-Perpetual opportunities");
            match spot.filter(|s| !s.is_empty()) {
                None => warn!("Skipping Spot-Perpetual analysis: no spot pairs available"),
                Some(spot) => {
                    let results = self.scan_spot_perp(&datasets, Arc::new(spot)).await?;
                    report.statistics.spot_perp_positive = results.positive.len();
                    report.statistics.spot_perp_negative = results.negative.len();
                    report.spot_perp = Some(results);
                }
            }
        }

        report.statistics.elapsed_ms = started.elapsed().as_millis() as u64;
        Ok(report)
    }

    async fn scan_perp_perp(
        &self,
        datasets: &[Arc<ExchangeDataset>],
        statistics: &mut ScanStatistics,
    ) -> Result<Vec<PerpPerpOpportunity>> {
        let computer = PerpPerpComputer::new(&self.config.analysis);

        let mut tasks = Vec::new();
        for (i, a) in datasets.iter().enumerate() {
            for b in &datasets[i + 1..] {
                let (computer, a, b) = (computer.clone(), Arc::clone(a), Arc::clone(b));
                tasks.push(tokio::task::spawn_blocking(move || {
                    computer.compute(a.exchange(), b.exchange(), &a, &b)
                }));
            }
        }
        statistics.exchange_combinations = tasks.len();

        let mut merged = Vec::new();
        for result in join_all(tasks).await {
            merged.extend(result?);
        }

        if merged.is_empty() {
            warn!("No Perpetual-Perpetual opportunities: the exchanges share no pairs");
        }

        let ranked = sort_perp_perp(merged);
        for o in &ranked {
            log_opportunity!(
                debug,
                "perp_perp",
                o.pair,
                o.short_exchange,
                o.long_exchange,
                o.apy_historical_average,
                diff = %o.cumulative_rate_diff.main,
                "Perpetual-Perpetual opportunity"
            );
        }
        metrics::record_opportunities("perp_perp", ranked.len());
        info!("Found {} Perpetual-Perpetual opportunities", ranked.len());

        Ok(ranked)
    }

    async fn scan_spot_perp(
        &self,
        datasets: &[Arc<ExchangeDataset>],
        spot: Arc<SpotAvailability>,
    ) -> Result<SpotPerpResults> {
        let computer = SpotPerpComputer::new(&self.config.analysis);

        let tasks: Vec<_> = datasets
            .iter()
            .map(|dataset| {
                let (computer, dataset, spot) = (computer.clone(), Arc::clone(dataset), Arc::clone(&spot));
                tokio::task::spawn_blocking(move || computer.compute(dataset.exchange(), &dataset, &spot))
            })
            .collect();

        let mut merged = Vec::new();
        for result in join_all(tasks).await {
            merged.extend(result?);
        }
        debug!("{} spot-perpetual rows above threshold", merged.len());

        let results = SpotPerpResults {
            positive: filter_and_sort(merged.clone(), RateSign::Positive),
            negative: filter_and_sort(merged, RateSign::Negative),
        };

        for o in results.positive.iter().chain(&results.negative) {
            log_opportunity!(
                debug,
                "spot_perp",
                o.pair,
                o.perp_exchange,
                o.spot_exchange,
                o.apy_historical_average,
                rate = %o.rate,
                "Spot-Perpetual opportunity"
            );
        }
        metrics::record_opportunities("spot_perp_positive", results.positive.len());
        metrics::record_opportunities("spot_perp_negative", results.negative.len());
        info!(
            "Found {} positive and {} negative Spot-Perpetual opportunities",
            results.positive.len(),
            results.negative.len()
        );

        Ok(results)
    }

    /// Load the run's venue tables, analyze them and write the result files
    pub async fn run(&self, run_dir: &RunDirectory) -> Result<ScanOutcome> {
        let loader = DatasetLoader::new(run_dir.data_dir()).with_amplitude_days(self.config.analysis.amplitude_days);
        info!("Loading exchange data from {}", loader.data_dir().display());

        let perpetual = self.config.exchanges.perpetual.clone();
        let perp_loader = loader.clone();
        let loaded = tokio::task::spawn_blocking(move || perp_loader.load_perpetual_datasets(&perpetual)).await?;

        let datasets = match loaded {
            Ok(datasets) => datasets,
            Err(e) => {
                if matches!(e.downcast_ref::<ArbitrageError>(), Some(ArbitrageError::NoVenueData(_))) {
                    warn!("Analysis aborted: {}", e);
                    metrics::record_aborted_run();
                    return Ok(ScanOutcome::Aborted { reason: e.to_string() });
                }
                return Err(e);
            }
        };

        let spot = if self.config.analysis.get_spot_perp_opportunities {
            let spot_exchanges = self.config.exchanges.spot.clone();
            let spot_loader = loader.clone();
            Some(tokio::task::spawn_blocking(move || spot_loader.load_spot_availability(&spot_exchanges)).await??)
        } else {
            None
        };

        let mut report = self.analyze(datasets, spot).await?;
        report.written = self.write_results(&report, run_dir)?;

        if !report.written.is_empty() {
            info!("Analysis finished. Results saved in {}", run_dir.result_dir().display());
        }

        Ok(ScanOutcome::Completed(report))
    }

    fn write_results(&self, report: &ScanReport, run_dir: &RunDirectory) -> Result<Vec<PathBuf>> {
        let writer = ResultWriter::new(run_dir.result_dir(), self.config.output.file_format);
        let venues = &self.config.exchanges.perpetual;
        let main_days = self.config.analysis.funding_historical_days;
        let mut written = Vec::new();

        if let Some(opportunities) = report.perp_perp.as_ref().filter(|o| !o.is_empty()) {
            let table = ResultTable::from_perp_perp(opportunities, main_days);
            written.push(writer.write(&table, &result_filename(ResultKind::PerpPerp, venues))?);
        }

        if let Some(results) = &report.spot_perp {
            for (sign, rows) in [(RateSign::Positive, &results.positive), (RateSign::Negative, &results.negative)] {
                let table = ResultTable::from_spot_perp(rows, main_days);
                written.push(writer.write(&table, &result_filename(ResultKind::SpotPerp(sign), venues))?);
            }
        }

        Ok(written)
    }
}
