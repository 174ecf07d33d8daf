//! Diagnostic hooks for the parse and combine pipeline.
//!
//! Components receive a `&dyn ParseObserver` instead of logging through a
//! global, which lets tests capture what was reported.

use std::path::Path;
use tracing::{debug, warn};

use crate::parser::BlockError;

pub trait ParseObserver {
    /// Called once per fragment after it has been scanned.
    fn fragment_parsed(&self, path: &Path, records: usize);

    /// Called for every block start that could not be turned into a record.
    fn block_skipped(&self, path: &Path, error: &BlockError);
}

/// Forwards observations to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn fragment_parsed(&self, path: &Path, records: usize) {
        debug!(path = %path.display(), records, "Parsed routes from fragment");
    }

    fn block_skipped(&self, path: &Path, error: &BlockError) {
        warn!(path = %path.display(), error = %error, "Skipping malformed route block");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Records every observation for assertions.
    #[derive(Default)]
    pub struct RecordingObserver {
        pub parsed: RefCell<Vec<(PathBuf, usize)>>,
        pub skipped: RefCell<Vec<(PathBuf, BlockError)>>,
    }

    impl ParseObserver for RecordingObserver {
        fn fragment_parsed(&self, path: &Path, records: usize) {
            self.parsed.borrow_mut().push((path.to_path_buf(), records));
        }

        fn block_skipped(&self, path: &Path, error: &BlockError) {
            self.skipped
                .borrow_mut()
                .push((path.to_path_buf(), error.clone()));
        }
    }
}
