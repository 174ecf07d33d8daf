//! Fragment aggregation and route merging.
//!
//! Collects records from every CSV fragment in the data directory,
//! merges duplicate routes and writes the combined table.

pub mod aggregate;
pub mod merge;

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::observer::ParseObserver;
use crate::output::{CombineSummary, remove_existing, write_routes};
use aggregate::collect_routes;
use merge::merge_routes;

/// Combines every fragment in `data_dir` into a single CSV at `output`.
///
/// The previous output is removed before the directory is scanned, so a
/// combined file stored alongside the fragments is never read back in.
#[tracing::instrument(skip_all, fields(data_dir = %data_dir.display(), output = %output.display()))]
pub fn combine(
    data_dir: &Path,
    output: &Path,
    observer: &dyn ParseObserver,
) -> Result<CombineSummary> {
    remove_existing(output)?;

    let collected = collect_routes(data_dir, observer)?;
    let parsed_records = collected.records.len();
    info!(files = collected.files, parsed_records, "Fragments parsed");

    let merged = merge_routes(collected.records);
    write_routes(output, &merged)?;

    Ok(CombineSummary {
        files: collected.files,
        parsed_records,
        merged_records: merged.len(),
        output_path: output.to_path_buf(),
    })
}
