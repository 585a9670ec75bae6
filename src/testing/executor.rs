//! # Test Case Execution
//!
//! Runs one fixture: load it, analyze its source under
//! [`AnalysisConfig::FULL`], compare the result with the fixture's
//! expectations. Every call starts from scratch.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::analyzer::{AnalysisConfig, Analyzer};
use crate::compare::{compare, Comparison, MismatchReport};
use crate::errors::FixtureError;
use crate::fixture::FixtureParser;

/// Why a single test case failed.
#[derive(Debug, Error)]
pub enum CaseFailure {
    #[error("{0}")]
    Mismatch(MismatchReport),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    #[error("test case panicked: {0}")]
    Panicked(String),
}

/// Binds a fixture parser to an analyzer.
pub struct CaseExecutor {
    parser: Arc<dyn FixtureParser>,
    analyzer: Arc<dyn Analyzer>,
}

impl CaseExecutor {
    /// The configuration every fixture is analyzed with.
    pub const CONFIG: AnalysisConfig = AnalysisConfig::FULL;

    pub fn new(parser: Arc<dyn FixtureParser>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self { parser, analyzer }
    }

    /// Executes the fixture at `path`. `Ok(())` means the analyzer produced
    /// exactly the expected diagnostics, in order.
    pub fn run(&self, path: &Path) -> Result<(), CaseFailure> {
        let fixture = self.parser.parse(path)?;
        let obtained = self.analyzer.analyze(&fixture.source, &Self::CONFIG);
        trace!(
            path = %path.display(),
            expected = fixture.expectations.len(),
            obtained = obtained.len(),
            "fixture analyzed"
        );
        match compare(&fixture.expectations, &obtained) {
            Comparison::Match => Ok(()),
            Comparison::Mismatch(report) => Err(CaseFailure::Mismatch(report)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;
    use crate::diagnostic::{Diagnostic, ExpectedDiagnostic};
    use crate::fixture::Fixture;

    /// Hands out a fixed fixture for every path.
    struct Canned(Vec<ExpectedDiagnostic>);

    impl FixtureParser for Canned {
        fn parse(&self, path: &Path) -> Result<Fixture, FixtureError> {
            Ok(Fixture {
                path: path.to_path_buf(),
                source: "source text".to_string(),
                expectations: self.0.clone(),
            })
        }
    }

    fn executor(expected: Vec<ExpectedDiagnostic>, obtained: Vec<Diagnostic>) -> CaseExecutor {
        let analyzer = move |_: &str, _: &AnalysisConfig| obtained.clone();
        CaseExecutor::new(Arc::new(Canned(expected)), Arc::new(analyzer))
    }

    #[test]
    fn empty_expectation_and_clean_source_pass() {
        assert!(executor(vec![], vec![]).run(Path::new("a.sx")).is_ok());
    }

    #[test]
    fn missing_diagnostic_fails_with_report() {
        let exec = executor(vec![ExpectedDiagnostic::new("TypeError", "Invalid type")], vec![]);
        let failure = exec.run(Path::new("a.sx")).unwrap_err();
        let text = failure.to_string();
        assert!(text.starts_with("Test expectation mismatch.\n"));
        assert!(text.contains("Expected result:\n\tTypeError: Invalid type\n"));
        assert!(text.contains("Obtained result:\n\tSuccess\n"));
    }

    #[test]
    fn order_mismatch_fails() {
        let exec = executor(
            vec![
                ExpectedDiagnostic::new("Warning", "a"),
                ExpectedDiagnostic::new("Warning", "b"),
            ],
            vec![Diagnostic::new("Warning", "b"), Diagnostic::new("Warning", "a")],
        );
        assert!(matches!(
            exec.run(Path::new("a.sx")),
            Err(CaseFailure::Mismatch(_))
        ));
    }

    #[test]
    fn analyzer_sees_source_and_full_config() {
        let seen: Arc<Mutex<Vec<(String, AnalysisConfig)>>> = Arc::default();
        let record = Arc::clone(&seen);
        let analyzer = move |source: &str, config: &AnalysisConfig| {
            record
                .lock()
                .unwrap()
                .push((source.to_string(), *config));
            Vec::<Diagnostic>::new()
        };
        let exec = CaseExecutor::new(Arc::new(Canned(vec![])), Arc::new(analyzer));
        exec.run(Path::new("a.sx")).unwrap();
        exec.run(Path::new("b.sx")).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen
            .iter()
            .all(|(src, cfg)| src == "source text" && *cfg == AnalysisConfig::FULL));
    }

    #[test]
    fn unreadable_fixture_is_a_fixture_failure() {
        let exec = CaseExecutor::new(
            Arc::new(crate::fixture::TrailerParser),
            Arc::new(|_: &str, _: &AnalysisConfig| Vec::<Diagnostic>::new()),
        );
        let missing = PathBuf::from("no/such/fixture.sx");
        assert!(matches!(
            exec.run(&missing),
            Err(CaseFailure::Fixture(FixtureError::Io { .. }))
        ));
    }
}
