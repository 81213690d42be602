//! Logging utilities

use crate::Result;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Registry,
};

/// Initialize logging system
pub fn init<P: AsRef<Path>>(log_level: &str, log_file: P) -> Result<()> {
    let log_file = log_file.as_ref();
    let log_dir = log_file.parent().unwrap_or(Path::new("."));

    // Create log directory if it doesn't exist
    std::fs::create_dir_all(log_dir)?;

    // Create file appender with daily rotation
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        log_dir,
        log_file.file_name().unwrap_or(std::ffi::OsStr::new("funding-scanner.log")),
    );

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    // Create file layer
    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(file_appender);

    // Create environment filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // Initialize subscriber
    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Log a perpetual venue with structured fields
#[macro_export]
macro_rules! log_venue {
    ($level:ident, $exchange:expr, $pairs:expr, $($field:tt)*) => {
        tracing::$level!(
            exchange = %$exchange,
            pairs = %$pairs,
            $($field)*
        );
    };
}

/// Log an opportunity with structured fields
#[macro_export]
macro_rules! log_opportunity {
    ($level:ident, $kind:expr, $pair:expr, $short:expr, $long:expr, $apy:expr, $($field:tt)*) => {
        tracing::$level!(
            kind = %$kind,
            pair = %$pair,
            short = %$short,
            long = %$long,
            apy = %$apy,
            $($field)*
        );
    };
}
