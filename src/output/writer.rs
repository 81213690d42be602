//! Result file emission

use super::ResultTable;
use crate::config::FileFormat;
use crate::strategy::RateSign;
use crate::{ArbitrageError, Result};
use indexmap::IndexMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result report kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// Perpetual-perpetual spreads
    PerpPerp,
    /// Spot-perpetual rows of one rate sign
    SpotPerp(RateSign),
}

/// File stem for a report: `result_{kind}_{venues}` with venues joined by `_`
pub fn result_filename(kind: ResultKind, perpetual_exchanges: &[String]) -> String {
    let venues = perpetual_exchanges.join("_");
    match kind {
        ResultKind::PerpPerp => format!("result_perp_perp_{}", venues),
        ResultKind::SpotPerp(sign) => format!("result_spot_perp_{}_{}", sign.as_str(), venues),
    }
}

/// Writes result tables into a directory
#[derive(Debug, Clone)]
pub struct ResultWriter {
    directory: PathBuf,
    format: FileFormat,
}

impl ResultWriter {
    /// Create a writer
    pub fn new<P: AsRef<Path>>(directory: P, format: FileFormat) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            format,
        }
    }

    /// Path a file stem would be written to
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", filename, self.format.extension()))
    }

    /// Write `table` under `filename`, creating the directory as needed
    pub fn write(&self, table: &ResultTable, filename: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.directory).map_err(|e| {
            ArbitrageError::Io(format!("Failed to create {}: {}", self.directory.display(), e))
        })?;

        let path = self.path_for(filename);
        match self.format {
            FileFormat::Csv => write_csv(table, &path)?,
            FileFormat::Json => write_json(table, &path)?,
        }

        info!("Wrote {} rows to {}", table.len(), path.display());
        Ok(path)
    }
}

fn write_csv(table: &ResultTable, path: &Path) -> Result<()> {
    let output_err = |e: csv::Error| ArbitrageError::Output(format!("{}: {}", path.display(), e));

    let mut writer = csv::Writer::from_path(path).map_err(output_err)?;
    writer.write_record(&table.columns).map_err(output_err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|cell| cell.to_field()))
            .map_err(output_err)?;
    }
    writer
        .flush()
        .map_err(|e| ArbitrageError::Output(format!("{}: {}", path.display(), e)))?;

    Ok(())
}

fn write_json(table: &ResultTable, path: &Path) -> Result<()> {
    let records: Vec<IndexMap<&str, serde_json::Value>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(|cell| cell.to_json()))
                .collect()
        })
        .collect();

    let file = File::create(path)
        .map_err(|e| ArbitrageError::Io(format!("Failed to create {}: {}", path.display(), e)))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)
        .map_err(|e| ArbitrageError::Output(format!("{}: {}", path.display(), e)))?;

    Ok(())
}
