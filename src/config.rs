//! Paths and defaults for a report run.
//!
//! Every file the tool touches is derived from one report base path:
//!
//! | File                | Path                    |
//! |---------------------|-------------------------|
//! | source PDF          | `<base>.pdf`            |
//! | table fragment `k`  | `<base>-<k>.csv`        |
//! | combined output     | `<base>-all.csv`        |
//! | data directory      | parent of `<base>`      |

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_BASE: &str = "data/ntc-report-2022";
pub const DEFAULT_PAGES: &str = "199-215";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub report_base: PathBuf,
    pub pages: String,
    pub report_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_base: PathBuf::from(DEFAULT_REPORT_BASE),
            pages: DEFAULT_PAGES.to_string(),
            report_url: None,
        }
    }
}

impl Config {
    /// Built-in defaults overridden by `NTC_REPORT_BASE`, `NTC_PDF_PAGES`
    /// and `NTC_REPORT_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            report_base: lookup("NTC_REPORT_BASE")
                .map(PathBuf::from)
                .unwrap_or(defaults.report_base),
            pages: lookup("NTC_PDF_PAGES").unwrap_or(defaults.pages),
            report_url: lookup("NTC_REPORT_URL").or(defaults.report_url),
        }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut path: OsString = self.report_base.clone().into_os_string();
        path.push(suffix);
        PathBuf::from(path)
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.with_suffix(".pdf")
    }

    pub fn fragment_path(&self, index: usize) -> PathBuf {
        self.with_suffix(&format!("-{index}.csv"))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.with_suffix("-all.csv")
    }

    /// Directory scanned for fragments.
    pub fn data_dir(&self) -> PathBuf {
        match self.report_base.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_paths() {
        let config = Config::default();

        assert_eq!(config.pdf_path(), PathBuf::from("data/ntc-report-2022.pdf"));
        assert_eq!(
            config.fragment_path(3),
            PathBuf::from("data/ntc-report-2022-3.csv")
        );
        assert_eq!(
            config.combined_path(),
            PathBuf::from("data/ntc-report-2022-all.csv")
        );
        assert_eq!(config.data_dir(), PathBuf::from("data"));
        assert_eq!(config.pages, "199-215");
    }

    #[test]
    fn test_bare_base_uses_current_dir() {
        let config = Config {
            report_base: PathBuf::from("report"),
            ..Config::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("NTC_REPORT_BASE", "/tmp/ntc/report-2023"),
            ("NTC_REPORT_URL", "https://example.org/report.pdf"),
        ]);

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.report_base, PathBuf::from("/tmp/ntc/report-2023"));
        assert_eq!(config.pages, DEFAULT_PAGES);
        assert_eq!(
            config.report_url.as_deref(),
            Some("https://example.org/report.pdf")
        );
    }
}
