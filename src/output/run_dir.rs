//! Per-run directory layout
//!
//! ```text
//! {directory}/{date}/data      venue tables
//! {directory}/{date}/result    result files
//! ```
//!
//! The date level is omitted when date subfolders are disabled.

use crate::config::OutputConfig;
use chrono::Local;
use std::path::{Path, PathBuf};

const DATA_SUBDIR: &str = "data";
const RESULT_SUBDIR: &str = "result";

/// Resolved base directory of one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    root: PathBuf,
}

impl RunDirectory {
    /// Use `root` as the run base directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve from output settings.
    ///
    /// An explicit `date` wins and always adds a date level. Otherwise the configured
    /// `date_subfolder` is used, falling back to today's local date.
    pub fn from_config(output: &OutputConfig, date: Option<&str>) -> Self {
        let base = PathBuf::from(&output.directory);

        let date_level = match date.filter(|d| !d.is_empty()) {
            Some(date) => Some(date.to_string()),
            None if !output.use_date_subfolder => None,
            None if !output.date_subfolder.is_empty() => Some(output.date_subfolder.clone()),
            None => Some(Local::now().format(&output.date_subfolder_format).to_string()),
        };

        match date_level {
            Some(date) => Self::new(base.join(date)),
            None => Self::new(base),
        }
    }

    /// Run base directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the venue tables
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_SUBDIR)
    }

    /// Directory receiving the result files
    pub fn result_dir(&self) -> PathBuf {
        self.root.join(RESULT_SUBDIR)
    }
}
