use anyhow::{Context, Result};
use lopdf::Document;
use std::path::Path;
use tracing::debug;

use super::pages::PageRange;
use super::{Table, TableExtractor};
use crate::parser::{COLUMN_HEADER_LABEL, TOTAL_ROW_LABEL};

/// Cells a row needs before a following ordinal may open the next row:
/// ordinal, route, location and grade.
const MIN_ROW_CELLS: usize = 4;

/// Rebuilds the route table of each selected page from its text.
///
/// Text lines before the first row go to the table header. A row opens on
/// a line holding the next row ordinal and collects the following lines
/// as cells, up to the bus total line that closes the table.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageTextExtractor;

impl TableExtractor for PageTextExtractor {
    fn extract(&self, pdf: &Path, pages: &PageRange) -> Result<Vec<Table>> {
        let document = Document::load(pdf)
            .with_context(|| format!("Failed to load PDF {}", pdf.display()))?;
        let count = document.get_pages().len() as u32;

        let mut tables = Vec::new();
        for page in pages.resolve(count)? {
            let text = document
                .extract_text(&[page])
                .with_context(|| format!("Failed to extract text from page {page}"))?;
            let table = page_table(page, &text);
            debug!(page, rows = table.rows.len(), "Extracted page table");
            tables.push(table);
        }

        Ok(tables)
    }
}

pub(crate) fn page_table(page: u32, text: &str) -> Table {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut table = Table {
        page,
        ..Default::default()
    };

    // rows only start once the column header has gone by, if there is one
    let mut in_body = !lines.iter().any(|l| l.starts_with(COLUMN_HEADER_LABEL));
    let mut next_ordinal: Option<i64> = None;

    for line in lines {
        if line.starts_with(TOTAL_ROW_LABEL) {
            break;
        }
        if !in_body {
            in_body = line.starts_with(COLUMN_HEADER_LABEL);
            table.header.push(line.to_string());
            continue;
        }

        let ordinal = line.parse::<i64>().ok().filter(|n| *n > 0);
        let opens_row = match (ordinal, next_ordinal) {
            (Some(_), None) => true,
            (Some(n), Some(expected)) => {
                n == expected
                    && table
                        .rows
                        .last()
                        .is_some_and(|row| row.len() >= MIN_ROW_CELLS)
            }
            (None, _) => false,
        };

        if let Some(n) = ordinal.filter(|_| opens_row) {
            table.rows.push(vec![line.to_string()]);
            next_ordinal = Some(n + 1);
        } else if let Some(row) = table.rows.last_mut() {
            row.push(line.to_string());
        } else {
            table.header.push(line.to_string());
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "National Transport Commission
Route Statistics 2022
Route No
Route
Origin - Destination
Grade
Distance (km)
Daily km
1
01
COLOMBO - KANDY
Normal
12

116.0
1392.0
2
2
Colombo - Matara
Normal
160.0
1280.0
NormaL Bus Total
2672.0
";

    #[test]
    fn test_page_table_groups_rows() {
        let table = page_table(199, PAGE);

        assert_eq!(table.page, 199);
        assert_eq!(table.header.first().map(String::as_str), Some("National Transport Commission"));
        assert_eq!(table.header.last().map(String::as_str), Some("Daily km"));
        assert_eq!(
            table.rows,
            vec![
                vec!["1", "01", "COLOMBO - KANDY", "Normal", "12", "116.0", "1392.0"],
                vec!["2", "2", "Colombo - Matara", "Normal", "160.0", "1280.0"],
            ]
        );
    }

    #[test]
    fn test_page_table_without_column_header() {
        let table = page_table(200, "37\n140\nKandy - Jaffna\nNormal\n320\n640\n");

        assert!(table.header.is_empty());
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "37");
    }

    #[test]
    fn test_page_table_no_rows() {
        let table = page_table(5, "Route No\nRoute\n\n");

        assert!(table.rows.is_empty());
        assert_eq!(table.header, vec!["Route No", "Route"]);
    }

    #[test]
    fn test_extract_missing_pdf() {
        let range: PageRange = "1".parse().unwrap();
        let result = PageTextExtractor.extract(Path::new("/nonexistent/report.pdf"), &range);
        assert!(result.is_err());
    }
}
