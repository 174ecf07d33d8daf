//! Output formatting and persistence for route statistics.
//!
//! Supports writing the combined CSV and reporting a run summary.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::record::{HEADER, RouteRecord};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a combine run.
#[derive(Debug, Default, Serialize)]
pub struct CombineSummary {
    pub files: usize,
    pub parsed_records: usize,
    pub merged_records: usize,
    pub output_path: PathBuf,
}

/// Logs the summary as structured fields.
pub fn log_summary(summary: &CombineSummary) {
    info!(
        files = summary.files,
        parsed = summary.parsed_records,
        merged = summary.merged_records,
        output = %summary.output_path.display(),
        "Combined fragments"
    );
}

/// Renders the summary as pretty-printed JSON.
pub fn summary_json(summary: &CombineSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Removes the file at `path` if it exists.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
        debug!(path = %path.display(), "Removed previous output");
    }
    Ok(())
}

/// Writes `records` to a fresh CSV file at `path`.
///
/// Any existing file is replaced. The header row is always written, so an
/// empty record list produces a header-only file.
pub fn write_routes(path: &Path, records: &[RouteRecord]) -> Result<()> {
    remove_existing(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = records.len(), "Wrote route CSV");
    Ok(())
}
