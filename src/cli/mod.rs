//! The syntest Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and wires the
//! bundled fixture parser and reference analyzer into the harness.
//!
//! Exit status: 0 when everything passed, 1 when at least one fixture failed,
//! 2 when the run could not start (configuration or corpus errors).

use std::io;
use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser;
use termcolor::StandardStream;
use tracing::Level;

use crate::analyzer::{Analyzer, SexprAnalyzer};
use crate::cli::args::{Command, CorpusArgs, SyntestArgs};
use crate::cli::output::{
    print_listing, print_trailer, report_results, results_to_json, stream_color, ReportConfig,
};
use crate::compare::compare;
use crate::fixture::{FixtureParser, TrailerParser};
use crate::testing::executor::CaseExecutor;
use crate::testing::registrar::register_all;
use crate::testing::runner::{partition_results, run_suite, RunConfig};
use crate::testing::suite::TestSuite;

pub mod args;
pub mod output;

const EXIT_FAILED: i32 = 1;
const EXIT_FATAL: i32 = 2;

/// The main entry point for the CLI.
pub fn run() {
    let args = SyntestArgs::parse();
    init_tracing(args.verbose);

    let code = match args.command {
        Command::Run {
            corpus,
            filter,
            diff,
            json,
            no_color,
        } => {
            let config = ReportConfig {
                use_colors: !no_color && !json,
                show_diff: diff,
            };
            handle_run(&corpus, filter, json, &config)
        }
        Command::List { corpus } => handle_list(&corpus),
        Command::Analyze { file } => handle_analyze(&file),
    };
    process::exit(code);
}

/// The harness as the binary runs it: trailer fixtures, reference analyzer.
pub fn default_executor() -> Arc<CaseExecutor> {
    Arc::new(CaseExecutor::new(
        Arc::new(TrailerParser),
        Arc::new(SexprAnalyzer),
    ))
}

/// Registers the corpus into a fresh master suite, or reports why it could
/// not be registered.
fn register(corpus: &CorpusArgs) -> Result<TestSuite, i32> {
    let mut master = TestSuite::new("syntest");
    match register_all(&corpus.to_options(), &mut master, default_executor()) {
        Ok(_) => Ok(master),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            Err(EXIT_FATAL)
        }
    }
}

fn handle_run(corpus: &CorpusArgs, filter: Option<String>, json: bool, config: &ReportConfig) -> i32 {
    let master = match register(corpus) {
        Ok(master) => master,
        Err(code) => return code,
    };
    let results = run_suite(&master, &RunConfig { filter });

    let summary = if json {
        match results_to_json(&results) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: failed to serialize results: {}", e);
                return EXIT_FATAL;
            }
        }
        partition_results(&results)
    } else {
        let mut stdout = StandardStream::stdout(stream_color(config, atty::Stream::Stdout));
        let mut stderr = StandardStream::stderr(stream_color(config, atty::Stream::Stderr));
        match report_results(&results, config, &mut stdout, &mut stderr) {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("Error: failed to write report: {}", e);
                return EXIT_FATAL;
            }
        }
    };

    if summary.success() {
        0
    } else {
        EXIT_FAILED
    }
}

fn handle_list(corpus: &CorpusArgs) -> i32 {
    let master = match register(corpus) {
        Ok(master) => master,
        Err(code) => return code,
    };
    match print_listing(&master, &mut io::stdout().lock()) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FATAL
        }
    }
}

/// Prints what the analyzer reports for one fixture, and whether that
/// matches the fixture's own trailer.
fn handle_analyze(path: &Path) -> i32 {
    let fixture = match TrailerParser.parse(path) {
        Ok(fixture) => fixture,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return EXIT_FATAL;
        }
    };
    let obtained = SexprAnalyzer.analyze(&fixture.source, &CaseExecutor::CONFIG);
    if let Err(e) = print_trailer(&obtained, &mut io::stdout().lock()) {
        eprintln!("Error: {}", e);
        return EXIT_FATAL;
    }
    if !compare(&fixture.expectations, &obtained).is_match() {
        eprintln!("note: {} does not match its current expectations", path.display());
    }
    0
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
