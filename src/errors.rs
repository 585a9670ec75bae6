//! Syntest Error Handling
//!
//! Two families of errors live here:
//!
//! - [`HarnessError`]: startup-class failures. Any of these aborts the run
//!   before a single test case executes.
//! - [`FixtureError`]: a single fixture could not be loaded. It fails the
//!   owning test case and nothing else.
//!
//! Both are `miette` diagnostics so the CLI can render them with codes, help
//! text and (for malformed trailers) a labelled snippet of the fixture.

use std::io;
use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::testing::options::{FIXTURES_SUBDIR, TEST_PATH_ENV, TEST_PATH_FLAG};

/// Fatal errors raised while locating and registering the fixture corpus.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error(
        "No path to the test files was specified. \
         Use the {flag} command line option or the {env} environment variable.",
        flag = TEST_PATH_FLAG,
        env = TEST_PATH_ENV
    )]
    #[diagnostic(
        code(syntest::config::unset),
        help("point it at the directory that contains `compiler-fixtures`")
    )]
    TestPathUnset,

    #[error("test path `{}` is not an existing directory", .path.display())]
    #[diagnostic(code(syntest::config::root))]
    RootNotDirectory { path: PathBuf },

    #[error("{} directory not found at `{}`", FIXTURES_SUBDIR, .path.display())]
    #[diagnostic(
        code(syntest::corpus::missing),
        help("fixtures are discovered under `<testpath>/compiler-fixtures`")
    )]
    CorpusNotFound { path: PathBuf },

    #[error("no fixtures found in `{}`", .path.display())]
    #[diagnostic(
        code(syntest::corpus::empty),
        help("a configured but empty corpus is treated as a configuration error")
    )]
    EmptyCorpus { path: PathBuf },

    #[error("failed to list fixture directory `{}`", .path.display())]
    #[diagnostic(code(syntest::discovery::io))]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while reading a single fixture.
#[derive(Debug, Error, Diagnostic)]
pub enum FixtureError {
    #[error("failed to read fixture `{}`", .path.display())]
    #[diagnostic(code(syntest::fixture::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed expectation on line {line}")]
    #[diagnostic(
        code(syntest::fixture::trailer),
        help("expectations after `// ----` take the form `// <Kind>: <message>`")
    )]
    MalformedExpectation {
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected `// <Kind>: <message>`")]
        span: SourceSpan,
    },
}
