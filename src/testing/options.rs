//! Harness configuration, passed explicitly to the registrar.

use std::path::PathBuf;

/// Command-line option naming the fixtures root.
pub const TEST_PATH_FLAG: &str = "--testpath";

/// Environment variable naming the fixtures root.
pub const TEST_PATH_ENV: &str = "SYNTEST_PATH";

/// Directory under the fixtures root that holds the corpus.
pub const FIXTURES_SUBDIR: &str = "compiler-fixtures";

/// Order in which directory entries are visited during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Sorted by file name, so test order is the same on every platform.
    #[default]
    Sorted,
    /// Whatever order the directory listing produces.
    Listing,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Root directory containing `compiler-fixtures`. `None` when neither
    /// the command line nor the environment supplied one.
    pub test_path: Option<PathBuf>,
    pub order: EntryOrder,
}

impl Options {
    pub fn new(test_path: impl Into<PathBuf>) -> Self {
        Self {
            test_path: Some(test_path.into()),
            order: EntryOrder::default(),
        }
    }

    pub fn with_order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }
}
