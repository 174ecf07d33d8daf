//! Page selection syntax for table extraction.
//!
//! A selection is a comma-separated list of 1-based pages or inclusive
//! ranges, e.g. `"199-215"` or `"1,3,5-7"`. A range may end in `end`
//! (`"4-end"`) and the whole selection may be `all`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRangeError {
    #[error("page selection is empty")]
    Empty,

    #[error("invalid page number {0:?}")]
    InvalidPage(String),

    #[error("page numbers start at 1")]
    ZeroPage,

    #[error("page range {start}-{end} runs backwards")]
    Reversed { start: u32, end: u32 },

    #[error("page {page} is past the last page of the document ({count})")]
    OutOfBounds { page: u32, count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Page(u32),
    /// Inclusive; `None` runs to the last page.
    Range(u32, Option<u32>),
}

/// A parsed page selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    parts: Vec<Part>,
    all: bool,
}

fn page_number(text: &str) -> Result<u32, PageRangeError> {
    let page: u32 = text
        .trim()
        .parse()
        .map_err(|_| PageRangeError::InvalidPage(text.trim().to_string()))?;
    if page == 0 {
        return Err(PageRangeError::ZeroPage);
    }
    Ok(page)
}

impl FromStr for PageRange {
    type Err = PageRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PageRangeError::Empty);
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageRange {
                parts: Vec::new(),
                all: true,
            });
        }

        let mut parts = Vec::new();
        for item in s.split(',') {
            let part = match item.split_once('-') {
                Some((start, end)) => {
                    let start = page_number(start)?;
                    if end.trim().eq_ignore_ascii_case("end") {
                        Part::Range(start, None)
                    } else {
                        let end = page_number(end)?;
                        if end < start {
                            return Err(PageRangeError::Reversed { start, end });
                        }
                        Part::Range(start, Some(end))
                    }
                }
                None => Part::Page(page_number(item)?),
            };
            parts.push(part);
        }

        Ok(PageRange { parts, all: false })
    }
}

impl PageRange {
    /// Expands the selection against a document of `count` pages.
    ///
    /// Pages come back sorted and without duplicates.
    pub fn resolve(&self, count: u32) -> Result<Vec<u32>, PageRangeError> {
        if self.all {
            return Ok((1..=count).collect());
        }

        let mut pages = Vec::new();
        for part in &self.parts {
            let (start, end) = match *part {
                Part::Page(p) => (p, p),
                Part::Range(start, Some(end)) => (start, end),
                Part::Range(start, None) => (start, count),
            };
            for page in [start, end] {
                if page > count {
                    return Err(PageRangeError::OutOfBounds { page, count });
                }
            }
            pages.extend(start..=end);
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(pages)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all {
            return write!(f, "all");
        }
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match part {
                Part::Page(p) => write!(f, "{p}")?,
                Part::Range(start, Some(end)) => write!(f, "{start}-{end}")?,
                Part::Range(start, None) => write!(f, "{start}-end")?,
            }
        }
        Ok(())
    }
}
