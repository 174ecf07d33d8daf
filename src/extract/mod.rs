//! PDF table extraction into CSV fragments.
//!
//! Each extracted table is written to its own `<base>-<index>.csv` file,
//! which the combine step later reads back. Fragments use the layout the
//! row parser scans: a five-line metadata header, then one quoted
//! multi-line cell per table row with one field per line.

pub mod pages;
pub mod pdf;

pub use pages::{PageRange, PageRangeError};
pub use pdf::PageTextExtractor;

use anyhow::{Context, Result, bail};
use csv::{QuoteStyle, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::parser::HEADER_LINES;

/// Lines each table row occupies in a fragment: ordinal, route, location,
/// grade, two spare cells, distance, daily.
pub const ROW_LINES: usize = 8;

/// Leading cells of a row that keep their position.
const LEAD_CELLS: usize = 4;

/// Trailing cells of a row that hold distance and daily km.
const TAIL_CELLS: usize = 2;

/// One table found in the report.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Table {
    /// 1-based page the table was found on.
    pub page: u32,
    /// Column header and title cells preceding the rows.
    pub header: Vec<String>,
    /// Cells of each row, starting with the row ordinal.
    pub rows: Vec<Vec<String>>,
}

/// Source of tables for the selected pages of a PDF.
pub trait TableExtractor {
    fn extract(&self, pdf: &Path, pages: &PageRange) -> Result<Vec<Table>>;
}

fn clean_cell(cell: &str) -> String {
    cell.replace(['\r', '\n'], " ").replace('"', "").trim().to_string()
}

/// Places the cells of `row` on their fragment lines.
///
/// The first four cells keep their position and the last two land on the
/// distance and daily lines. Cells in between fill the two spare lines,
/// with any surplus joined onto the second one.
pub fn row_lines(row: &[String]) -> [String; ROW_LINES] {
    let cells: Vec<String> = row.iter().map(|c| clean_cell(c)).collect();
    let mut lines: [String; ROW_LINES] = Default::default();

    if cells.len() >= LEAD_CELLS + TAIL_CELLS {
        let tail = cells.len() - TAIL_CELLS;
        lines[..LEAD_CELLS].clone_from_slice(&cells[..LEAD_CELLS]);
        lines[ROW_LINES - TAIL_CELLS..].clone_from_slice(&cells[tail..]);

        let spare = &cells[LEAD_CELLS..tail];
        if let Some(first) = spare.first() {
            lines[LEAD_CELLS] = first.clone();
        }
        if spare.len() > 1 {
            lines[LEAD_CELLS + 1] = spare[1..].join(" ");
        }
    } else {
        for (line, cell) in lines.iter_mut().zip(cells) {
            *line = cell;
        }
    }

    lines[0] = format!("\"{}", lines[0]);
    lines
}

/// Writes `table` to `path` as a fragment.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let header = table
        .header
        .iter()
        .map(|c| clean_cell(c))
        .collect::<Vec<_>>()
        .join(" | ");
    let metadata = [
        format!("page {}", table.page),
        header,
        format!("rows {}", table.rows.len()),
    ];

    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(&mut out);
        writer.write_record(["", "0"])?;
        for index in 0..HEADER_LINES - 1 {
            let text = metadata.get(index).map(String::as_str).unwrap_or("");
            writer.write_record([index.to_string().as_str(), text])?;
        }
        writer.flush()?;
    }

    for row in &table.rows {
        for line in row_lines(row) {
            writeln!(out, "{line}")?;
        }
    }
    out.flush()?;

    Ok(())
}

/// Writes each table to its fragment path and returns the paths written.
pub fn write_fragments(config: &Config, tables: &[Table]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(tables.len());

    for (index, table) in tables.iter().enumerate() {
        let path = config.fragment_path(index);
        write_table(&path, table)?;
        info!(path = %path.display(), page = table.page, rows = table.rows.len(), "Saved fragment");
        paths.push(path);
    }

    Ok(paths)
}

/// Extracts the configured pages of the report PDF into CSV fragments.
#[tracing::instrument(skip_all, fields(pdf = %config.pdf_path().display(), pages = %pages))]
pub fn extract_report(
    extractor: &dyn TableExtractor,
    config: &Config,
    pages: &PageRange,
) -> Result<Vec<PathBuf>> {
    let pdf = config.pdf_path();
    if !pdf.is_file() {
        bail!("PDF not found: {}", pdf.display());
    }

    info!("Extracting tables");
    let tables = extractor.extract(&pdf, pages)?;

    std::fs::create_dir_all(config.data_dir())?;

    write_fragments(config, &tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::testing::RecordingObserver;
    use crate::parser::parse_csv;
    use crate::record::RouteRecord;
    use std::fs;

    struct FixedTables(Vec<Table>);

    impl TableExtractor for FixedTables {
        fn extract(&self, _pdf: &Path, _pages: &PageRange) -> Result<Vec<Table>> {
            Ok(self.0.clone())
        }
    }

    fn config_in(dir: &Path) -> Config {
        Config {
            report_base: dir.join("ntc-report-2022"),
            ..Config::default()
        }
    }

    fn cells(row: &[&str]) -> Vec<String> {
        row.iter().map(|c| c.to_string()).collect()
    }

    fn table(page: u32, rows: &[&[&str]]) -> Table {
        Table {
            page,
            header: cells(&["Route No", "Route", "Origin - Destination", "Grade", "Distance", "Daily km"]),
            rows: rows.iter().map(|r| cells(r)).collect(),
        }
    }

    const KANDY: &[&str] = &["1", "01", "COLOMBO - KANDY", "Normal", "12", "116.0", "1392.0"];

    #[test]
    fn test_row_lines_full_row() {
        let lines = row_lines(&cells(&["3", "05", "Galle - Matara", "Normal", "4", "", "45", "90"]));
        assert_eq!(lines, ["\"3", "05", "Galle - Matara", "Normal", "4", "", "45", "90"]);
    }

    #[test]
    fn test_row_lines_pads_spare_cells() {
        let lines = row_lines(&cells(KANDY));
        assert_eq!(lines, ["\"1", "01", "COLOMBO - KANDY", "Normal", "12", "", "116.0", "1392.0"]);

        let lines = row_lines(&cells(&["2", "02", "A - B", "Normal", "116.0", "1392.0"]));
        assert_eq!(lines, ["\"2", "02", "A - B", "Normal", "", "", "116.0", "1392.0"]);
    }

    #[test]
    fn test_row_lines_joins_surplus_cells() {
        let lines = row_lines(&cells(&["2", "02", "A - B", "Normal", "4", "8", "9", "10.5", "21"]));
        assert_eq!(lines[4], "4");
        assert_eq!(lines[5], "8 9");
        assert_eq!(lines[6], "10.5");
        assert_eq!(lines[7], "21");
    }

    #[test]
    fn test_row_lines_short_row_and_quotes() {
        let lines = row_lines(&cells(&["\"7\"", "0\n8"]));
        assert_eq!(lines, ["\"7", "0 8", "", "", "", "", "", ""]);
    }

    #[test]
    fn test_write_table_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");

        write_table(&path, &table(199, &[KANDY])).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), HEADER_LINES + ROW_LINES);
        assert_eq!(lines[0], "\"\",\"0\"");
        assert_eq!(lines[1], "\"0\",\"page 199\"");
        assert!(lines[2].starts_with("\"1\",\"Route No | Route"));
        assert_eq!(lines[5], "\"1");
        assert_eq!(lines[10], "");
        assert_eq!(lines[12], "1392.0");
    }

    #[test]
    fn test_written_rows_parse_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let expected = RouteRecord {
            row_num: 1,
            route_id: "01".to_string(),
            location_start: "Colombo".to_string(),
            location_end: "Kandy".to_string(),
            route_grade: "Normal".to_string(),
            distance_km: 116.0,
            daily_km: 1392.0,
        };

        write_table(&path, &table(199, &[KANDY, KANDY, KANDY])).unwrap();
        let records = parse_csv(&path, &RecordingObserver::default()).unwrap();
        assert_eq!(records, vec![expected.clone(), expected.clone(), expected.clone()]);

        write_table(&path, &table(199, &[KANDY])).unwrap();
        let records = parse_csv(&path, &RecordingObserver::default()).unwrap();
        assert_eq!(records, vec![expected]);
    }

    #[test]
    fn test_empty_table_parses_to_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");

        write_table(&path, &table(3, &[])).unwrap();

        let observer = RecordingObserver::default();
        assert!(parse_csv(&path, &observer).unwrap().is_empty());
        assert!(observer.skipped.borrow().is_empty());
    }

    #[test]
    fn test_extract_report_writes_numbered_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(config.pdf_path(), b"%PDF-1.4").unwrap();
        let extractor = FixedTables(vec![table(199, &[KANDY]), table(200, &[])]);
        let pages: PageRange = "199-200".parse().unwrap();

        let paths = extract_report(&extractor, &config, &pages).unwrap();

        assert_eq!(
            paths,
            vec![
                dir.path().join("ntc-report-2022-0.csv"),
                dir.path().join("ntc-report-2022-1.csv"),
            ]
        );
        let second = fs::read_to_string(&paths[1]).unwrap();
        assert_eq!(second.lines().count(), HEADER_LINES);
    }

    #[test]
    fn test_extract_report_missing_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let pages: PageRange = "1".parse().unwrap();

        let result = extract_report(&FixedTables(Vec::new()), &config, &pages);

        assert!(result.is_err());
    }
}
