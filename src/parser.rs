//! Row parser for CSV fragments extracted from the route statistics tables.
//!
//! Table extraction spreads each table row over several physical lines.
//! A row starts on a line that opens with a double quote and its fields sit
//! at fixed line offsets from that start line.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::observer::ParseObserver;
use crate::record::RouteRecord;
use crate::utility::{parse_or_default, title_case};

/// Leading lines of every fragment that hold table metadata.
pub const HEADER_LINES: usize = 5;

/// Lines scanned past a block start before looking for the next one.
///
/// The block start line and the following five lines are never examined
/// as possible block starts.
pub const BLOCK_STRIDE: usize = 6;

/// Label of the first cell of the column header row.
pub const COLUMN_HEADER_LABEL: &str = "Route No";

/// Label of the first cell of the summary row closing each table.
pub const TOTAL_ROW_LABEL: &str = "NormaL Bus Total";

/// Line offsets of each field relative to the block start.
/// Offsets 4 and 5 hold subtotal and blank cells and are not read.
mod offset {
    pub const ROW_NUM: usize = 0;
    pub const ROUTE_ID: usize = 1;
    pub const LOCATION: usize = 2;
    pub const ROUTE_GRADE: usize = 3;
    pub const DISTANCE: usize = 6;
    pub const DAILY: usize = 7;
}

/// A block start line that could not be turned into a [`RouteRecord`].
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("block starting on line {start} ends before line {missing}")]
    Truncated { start: usize, missing: usize },

    #[error("line {line} is not a \"start - end\" location: {text:?}")]
    MalformedLocation { line: usize, text: String },
}

/// Returns true if `line` opens a route block.
pub fn is_block_start(line: &str) -> bool {
    line.strip_prefix('"').is_some_and(|cell| {
        !cell.starts_with(COLUMN_HEADER_LABEL) && !cell.starts_with(TOTAL_ROW_LABEL)
    })
}

/// Single forward scan over the lines of one fragment.
///
/// Yields one item per block start found; malformed blocks come out as
/// `Err` and the scan continues on the following line.
pub struct RouteBlocks<'a, S> {
    lines: &'a [S],
    pos: usize,
}

/// Starts a scan of `lines`, skipping the metadata header.
pub fn route_blocks<S: AsRef<str>>(lines: &[S]) -> RouteBlocks<'_, S> {
    RouteBlocks {
        lines,
        pos: HEADER_LINES,
    }
}

impl<S: AsRef<str>> Iterator for RouteBlocks<'_, S> {
    type Item = Result<RouteRecord, BlockError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.lines.len() {
            let start = self.pos;

            if !is_block_start(self.lines[start].as_ref()) {
                self.pos += 1;
                continue;
            }

            return match read_block(self.lines, start) {
                Ok(record) => {
                    self.pos = start + BLOCK_STRIDE;
                    Some(Ok(record))
                }
                Err(e) => {
                    self.pos = start + 1;
                    Some(Err(e))
                }
            };
        }

        None
    }
}

fn read_block<S: AsRef<str>>(lines: &[S], start: usize) -> Result<RouteRecord, BlockError> {
    let line = |off: usize| {
        lines
            .get(start + off)
            .map(|l| AsRef::<str>::as_ref(l))
            .ok_or(BlockError::Truncated {
                start: start + 1,
                missing: start + off + 1,
            })
    };

    let first = line(offset::ROW_NUM)?;
    let route_id = line(offset::ROUTE_ID)?.trim().to_string();
    let location = line(offset::LOCATION)?;
    let route_grade = line(offset::ROUTE_GRADE)?.trim().to_string();
    let distance = line(offset::DISTANCE)?;
    let daily = line(offset::DAILY)?;

    let mut parts = location.split('-');
    let (Some(location_start), Some(location_end)) = (parts.next(), parts.next()) else {
        return Err(BlockError::MalformedLocation {
            line: start + offset::LOCATION + 1,
            text: location.to_string(),
        });
    };

    Ok(RouteRecord {
        // the opening quote is always one byte
        row_num: parse_or_default(&first[1..], 0),
        route_id,
        location_start: title_case(location_start.trim()),
        location_end: title_case(location_end.trim()),
        route_grade,
        distance_km: parse_or_default(distance, 0.0),
        daily_km: parse_or_default(daily, 0.0),
    })
}

/// Parses every route block in `lines`, reporting skipped blocks and the
/// final count to `observer`.
pub fn parse_lines<S: AsRef<str>>(
    path: &Path,
    lines: &[S],
    observer: &dyn ParseObserver,
) -> Vec<RouteRecord> {
    let mut records = Vec::new();

    for block in route_blocks(lines) {
        match block {
            Ok(record) => records.push(record),
            Err(e) => observer.block_skipped(path, &e),
        }
    }

    observer.fragment_parsed(path, records.len());
    records
}

/// Reads the fragment at `path` and parses its route blocks.
///
/// # Errors
///
/// Returns an error if the file cannot be read as UTF-8 text.
pub fn parse_csv(path: &Path, observer: &dyn ParseObserver) -> Result<Vec<RouteRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fragment {}", path.display()))?;
    let lines: Vec<&str> = content.lines().collect();

    Ok(parse_lines(path, &lines, observer))
}
