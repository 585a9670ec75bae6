//! # Corpus Registration
//!
//! Entry point of the harness: validate the configuration, discover
//! `<testpath>/compiler-fixtures` and register one test case per fixture into
//! the host suite. Every failure here is fatal; no test runs after one.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::HarnessError;
use crate::testing::discovery::{
    discover, DirectorySource, EntryKind, FixtureGroup, FixtureNode, FsSource,
};
use crate::testing::executor::CaseExecutor;
use crate::testing::options::{Options, FIXTURES_SUBDIR};
use crate::testing::suite::{TestCase, TestSuite};

/// Registers the fixture corpus on disk into `host`. Returns the number of
/// test cases registered.
pub fn register_all(
    options: &Options,
    host: &mut TestSuite,
    executor: Arc<CaseExecutor>,
) -> Result<usize, HarnessError> {
    register_from(&FsSource, options, host, executor)
}

/// [`register_all`] over an arbitrary directory listing.
pub fn register_from(
    listing: &dyn DirectorySource,
    options: &Options,
    host: &mut TestSuite,
    executor: Arc<CaseExecutor>,
) -> Result<usize, HarnessError> {
    let tree = discover_corpus(listing, options)?;
    let count = tree.case_count();
    for node in tree.children {
        attach(node, host, &executor);
    }
    info!(cases = count, "registered fixture corpus");
    Ok(count)
}

/// Validates `options` and discovers the corpus without binding any
/// executor. The returned group holds a single `compiler-fixtures` group.
pub fn discover_corpus(
    listing: &dyn DirectorySource,
    options: &Options,
) -> Result<FixtureGroup, HarnessError> {
    let root = match options.test_path.as_deref() {
        Some(root) if !root.as_os_str().is_empty() => root,
        _ => return Err(HarnessError::TestPathUnset),
    };
    if listing.kind(root) != EntryKind::Directory {
        return Err(HarnessError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }
    let corpus = root.join(FIXTURES_SUBDIR);
    if listing.kind(&corpus) != EntryKind::Directory {
        return Err(HarnessError::CorpusNotFound { path: corpus });
    }

    debug!(root = %root.display(), order = ?options.order, "discovering fixtures");
    let mut tree = FixtureGroup::new("fixtures");
    let count = discover(
        listing,
        root,
        Path::new(FIXTURES_SUBDIR),
        options.order,
        &mut tree,
    )?;
    if count == 0 {
        return Err(HarnessError::EmptyCorpus { path: corpus });
    }
    Ok(tree)
}

/// Converts a discovered node into host suites and cases. Each case closes
/// over its own path and a shared executor, nothing else.
fn attach(node: FixtureNode, parent: &mut TestSuite, executor: &Arc<CaseExecutor>) {
    match node {
        FixtureNode::Group(group) => {
            let mut suite = TestSuite::new(group.name);
            for child in group.children {
                attach(child, &mut suite, executor);
            }
            parent.add_suite(suite);
        }
        FixtureNode::Case(case) => {
            let description = case.description();
            let executor = Arc::clone(executor);
            let path = case.path;
            parent.add_case(TestCase::new(
                case.name,
                description,
                Box::new(move || executor.run(&path)),
            ));
        }
    }
}
