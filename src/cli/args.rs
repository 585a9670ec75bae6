//! Defines the command-line arguments and subcommands for the syntest CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure. The fixtures root
//! can come from `--testpath` or from the `SYNTEST_PATH` environment variable.

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::testing::options::{EntryOrder, Options, TEST_PATH_ENV};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "syntest",
    version,
    about = "Checks compiler diagnostics against expectations embedded in fixture files."
)]
pub struct SyntestArgs {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover and run every fixture under `<testpath>/compiler-fixtures`.
    Run {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Only run fixtures whose qualified name contains this substring.
        #[arg(short, long)]
        filter: Option<String>,
        /// Show a line diff between expected and obtained diagnostics.
        #[arg(long)]
        diff: bool,
        /// Print results as JSON instead of text.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        no_color: bool,
    },
    /// List discovered fixtures without running them.
    List {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Analyze one fixture and print the diagnostics it produces, in trailer form.
    Analyze {
        /// The fixture file to analyze.
        #[arg(required = true)]
        file: PathBuf,
    },
}

/// Where the corpus lives and how to walk it.
#[derive(Debug, Clone, Args)]
pub struct CorpusArgs {
    /// Directory containing `compiler-fixtures`. An empty value counts as unset.
    #[arg(long = "testpath", env = TEST_PATH_ENV, value_name = "DIR")]
    pub test_path: Option<OsString>,
    /// Visit directory entries in listing order instead of sorting them.
    #[arg(long)]
    pub unsorted: bool,
}

impl CorpusArgs {
    pub fn to_options(&self) -> Options {
        Options {
            test_path: self
                .test_path
                .as_ref()
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            order: if self.unsorted {
                EntryOrder::Listing
            } else {
                EntryOrder::Sorted
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_testpath_and_flags() {
        let args = SyntestArgs::try_parse_from([
            "syntest",
            "run",
            "--testpath",
            "tests/fixtures",
            "--filter",
            "types",
            "--unsorted",
        ])
        .unwrap();
        match args.command {
            Command::Run { corpus, filter, .. } => {
                let options = corpus.to_options();
                assert_eq!(options.test_path, Some(PathBuf::from("tests/fixtures")));
                assert_eq!(options.order, EntryOrder::Listing);
                assert_eq!(filter.as_deref(), Some("types"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn empty_testpath_is_accepted_as_unset() {
        let args = SyntestArgs::try_parse_from(["syntest", "list", "--testpath", ""]).unwrap();
        match args.command {
            Command::List { corpus } => assert_eq!(corpus.to_options().test_path, None),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbosity_counts() {
        let args = SyntestArgs::try_parse_from(["syntest", "-vv", "analyze", "a.sx"]).unwrap();
        assert_eq!(args.verbose, 2);
    }
}
