//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colorizing result lines, printing failure
//! reports and diffs, and generating JSON. Every printer writes to a
//! `WriteColor` so the same code drives the terminal and in-memory buffers.

use std::io::{self, Write};

use difference::{Changeset, Difference};
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, WriteColor};

use crate::diagnostic::Diagnostic;
use crate::fixture::TRAILER_SEPARATOR;
use crate::testing::executor::CaseFailure;
use crate::testing::runner::{partition_results, Summary, TestResult};
use crate::testing::suite::TestSuite;

/// Presentation switches for a run report.
#[derive(Debug, Clone, Copy)]
pub struct ReportConfig {
    /// Colors are wanted at all. Each stream still only gets them when it is
    /// a terminal; see [`stream_color`].
    pub use_colors: bool,
    pub show_diff: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_diff: false,
        }
    }
}

/// Color choice for one output stream.
pub fn stream_color(config: &ReportConfig, stream: atty::Stream) -> ColorChoice {
    color_choice(config.use_colors, atty::is(stream))
}

fn color_choice(wanted: bool, is_terminal: bool) -> ColorChoice {
    if wanted && is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

// ============================================================================
// TEXT REPORT
// ============================================================================

/// Prints one line per result, failure details, and a summary. Passing and
/// skipped cases go to `out`, failures to `err`.
pub fn report_results(
    results: &[TestResult],
    config: &ReportConfig,
    out: &mut impl WriteColor,
    err: &mut impl WriteColor,
) -> io::Result<Summary> {
    for result in results {
        match result {
            TestResult::Pass { name, description } => {
                tag(out, "PASS", Color::Green, config)?;
                writeln!(out, ": {} [{}]", name, description)?;
            }
            TestResult::Fail {
                name,
                description,
                failure,
            } => print_failure(name, description, failure, config, err)?,
            TestResult::Skipped {
                name,
                description,
                reason,
            } => {
                tag(out, "SKIP", Color::Yellow, config)?;
                writeln!(out, ": {} [{}] ({})", name, description, reason)?;
            }
        }
    }

    let summary = partition_results(results);
    write!(out, "\nTest summary: total {}, ", summary.total())?;
    tag(out, "passed", Color::Green, config)?;
    write!(out, " {}, ", summary.passed)?;
    tag(out, "failed", Color::Red, config)?;
    write!(out, " {}, ", summary.failed)?;
    tag(out, "skipped", Color::Yellow, config)?;
    writeln!(out, " {}", summary.skipped)?;

    if summary.failed > 0 {
        writeln!(err, "\nFailed tests:")?;
        for result in results {
            if let TestResult::Fail { name, .. } = result {
                writeln!(err, "  - {}", name)?;
            }
        }
    }
    Ok(summary)
}

/// Prints a failing case with its report, indented under the case line.
pub fn print_failure(
    name: &str,
    description: &str,
    failure: &CaseFailure,
    config: &ReportConfig,
    err: &mut impl WriteColor,
) -> io::Result<()> {
    tag(err, "FAIL", Color::Red, config)?;
    writeln!(err, ": {} [{}]", name, description)?;
    for line in failure.to_string().lines() {
        writeln!(err, "  {}", line)?;
    }

    if let CaseFailure::Mismatch(report) = failure {
        if let Some(index) = report.first_divergence() {
            writeln!(err, "  First difference at entry {}.", index + 1)?;
        }
        if config.show_diff {
            writeln!(err, "  Diff:")?;
            let changeset = Changeset::new(&report.expected_section(), &report.obtained_section(), "\n");
            print_diff(err, &changeset.diffs, config)?;
        }
    }
    Ok(())
}

// ============================================================================
// OTHER OUTPUTS
// ============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    results: Vec<JsonResult<'a>>,
}

#[derive(Serialize)]
struct JsonResult<'a> {
    name: &'a str,
    description: &'a str,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Serializes results and their summary as a single JSON document.
pub fn results_to_json(results: &[TestResult]) -> serde_json::Result<String> {
    let report = JsonReport {
        summary: partition_results(results),
        results: results
            .iter()
            .map(|result| {
                let (outcome, message) = match result {
                    TestResult::Pass { .. } => ("pass", None),
                    TestResult::Fail { failure, .. } => ("fail", Some(failure.to_string())),
                    TestResult::Skipped { reason, .. } => ("skip", Some(reason.clone())),
                };
                JsonResult {
                    name: result.name(),
                    description: result.description(),
                    outcome,
                    message,
                }
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report)
}

/// Prints the qualified name and description of every registered case.
pub fn print_listing(suite: &TestSuite, out: &mut impl Write) -> io::Result<()> {
    for (name, case) in suite.cases() {
        writeln!(out, "{} [{}]", name, case.description)?;
    }
    Ok(())
}

/// Prints diagnostics as a fixture trailer, ready to paste below the source.
pub fn print_trailer(diagnostics: &[Diagnostic], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", TRAILER_SEPARATOR)?;
    for diag in diagnostics {
        writeln!(out, "// {}", diag)?;
    }
    Ok(())
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn tag(w: &mut impl WriteColor, text: &str, color: Color, config: &ReportConfig) -> io::Result<()> {
    if config.use_colors {
        w.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(w, "{}", text)?;
        w.reset()
    } else {
        write!(w, "{}", text)
    }
}

fn print_diff(
    w: &mut impl WriteColor,
    diffs: &[Difference],
    config: &ReportConfig,
) -> io::Result<()> {
    for diff in diffs {
        let (sign, color, text) = match diff {
            Difference::Same(x) => (' ', None, x),
            Difference::Add(x) => ('+', Some(Color::Green), x),
            Difference::Rem(x) => ('-', Some(Color::Red), x),
        };
        for line in text.lines() {
            if let (true, Some(color)) = (config.use_colors, color) {
                w.set_color(ColorSpec::new().set_fg(Some(color)))?;
            }
            writeln!(w, "  {}{}", sign, line)?;
            w.reset()?;
        }
    }
    Ok(())
}
