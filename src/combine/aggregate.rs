use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::observer::ParseObserver;
use crate::parser::parse_csv;
use crate::record::RouteRecord;

/// File name suffix of table fragments.
pub const FRAGMENT_SUFFIX: &str = ".csv";

/// Records gathered from every fragment of a directory.
#[derive(Debug, Default)]
pub struct Collected {
    pub records: Vec<RouteRecord>,
    pub files: usize,
}

/// Lists fragment files in `dir`, sorted by file name.
pub fn fragment_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read data directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        // names that are not UTF-8 still count when their suffix matches
        if entry.file_name().to_string_lossy().ends_with(FRAGMENT_SUFFIX) {
            paths.push(entry.path());
        }
    }

    paths.sort();
    Ok(paths)
}

/// Parses every fragment in `dir` and concatenates the records, in file
/// order and then line order.
pub fn collect_routes(dir: &Path, observer: &dyn ParseObserver) -> Result<Collected> {
    let mut collected = Collected::default();

    for path in fragment_paths(dir)? {
        let records = parse_csv(&path, observer)?;
        collected.records.extend(records);
        collected.files += 1;
    }

    Ok(collected)
}
