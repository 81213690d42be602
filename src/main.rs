use clap::{Parser, Subcommand};
use funding_rate_arbitrage::{
    config::ScannerConfig,
    output::RunDirectory,
    strategy::{FundingScanner, ScanOutcome},
    utils::logger,
    Result,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "funding-scanner")]
#[command(about = "Cross-exchange funding rate arbitrage scanner")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/funding.toml")]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log file path
    #[arg(long, default_value = "logs/funding-scanner.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the venue tables of a run directory
    Analyze {
        /// Date subfolder to analyze instead of the configured one
        #[arg(long)]
        date: Option<String>,
    },
    /// Validate configuration
    Validate,
    /// Write a default configuration file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    logger::init(&cli.log_level, &cli.log_file)?;

    info!("Starting Funding Rate Scanner v{}", funding_rate_arbitrage::VERSION);

    match cli.command {
        Commands::InitConfig { path } => init_config(path),
        Commands::Analyze { date } => {
            let config = load_config(&cli.config)?;
            run_analysis(config, date).await
        }
        Commands::Validate => {
            let config = load_config(&cli.config)?;
            validate_config(config)
        }
    }
}

fn load_config(path: &Path) -> Result<ScannerConfig> {
    let config = ScannerConfig::from_file(path)?;
    info!("Configuration loaded from: {}", path.display());
    Ok(config)
}

async fn run_analysis(config: ScannerConfig, date: Option<String>) -> Result<()> {
    config.validate()?;

    let run_dir = RunDirectory::from_config(&config.output, date.as_deref());
    info!("Analyzing funding rates in {}", run_dir.root().display());

    let scanner = FundingScanner::new(config);
    match scanner.run(&run_dir).await? {
        ScanOutcome::Completed(report) => {
            let stats = &report.statistics;
            info!(
                "Analysis completed in {} ms: {} venues, {} perp-perp, {} positive / {} negative spot-perp",
                stats.elapsed_ms,
                stats.venues_loaded,
                stats.perp_perp_opportunities,
                stats.spot_perp_positive,
                stats.spot_perp_negative
            );
            for path in &report.written {
                println!("{}", path.display());
            }
        }
        ScanOutcome::Aborted { reason } => {
            warn!("Nothing analyzed: {}", reason);
        }
    }

    Ok(())
}

fn validate_config(config: ScannerConfig) -> Result<()> {
    info!("Validating configuration...");

    match config.validate() {
        Ok(_) => {
            info!("✅ Configuration is valid");
            println!("Configuration validation passed!");
        }
        Err(e) => {
            error!("❌ Configuration validation failed: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

fn init_config(path: PathBuf) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, ScannerConfig::default().to_toml_string()?)?;

    info!("Default configuration written to {}", path.display());
    Ok(())
}
