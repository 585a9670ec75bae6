//! # Test Runner
//!
//! Executes a registered [`TestSuite`] case by case and collects one
//! [`TestResult`] per case. A failing or panicking case is recorded and the
//! run moves on; nothing a case does can stop its siblings from running.

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::trace;

use crate::testing::executor::CaseFailure;
use crate::testing::suite::{TestCase, TestSuite};

/// Outcome of a single test case.
#[derive(Debug)]
pub enum TestResult {
    Pass {
        name: String,
        description: String,
    },
    Fail {
        name: String,
        description: String,
        failure: CaseFailure,
    },
    Skipped {
        name: String,
        description: String,
        reason: String,
    },
}

impl TestResult {
    pub fn name(&self) -> &str {
        match self {
            TestResult::Pass { name, .. }
            | TestResult::Fail { name, .. }
            | TestResult::Skipped { name, .. } => name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            TestResult::Pass { description, .. }
            | TestResult::Fail { description, .. }
            | TestResult::Skipped { description, .. } => description,
        }
    }
}

/// Which cases to run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Only run cases whose qualified name contains this substring
    /// (case-insensitive).
    pub filter: Option<String>,
}

/// Pass/fail/skip counts of a run.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Runs every case of `suite` in registration order.
pub fn run_suite(suite: &TestSuite, config: &RunConfig) -> Vec<TestResult> {
    let filter = config.filter.as_deref().map(str::to_lowercase);
    suite
        .cases()
        .into_iter()
        .map(|(name, case)| {
            if let Some(reason) = skip_reason(&name, filter.as_deref()) {
                return TestResult::Skipped {
                    name,
                    description: case.description.clone(),
                    reason,
                };
            }
            run_case(name, case)
        })
        .collect()
}

/// Runs one case, turning a panic into a failure of that case.
pub fn run_case(name: String, case: &TestCase) -> TestResult {
    trace!(case = %name, "running");
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| case.run()))
        .unwrap_or_else(|payload| Err(CaseFailure::Panicked(panic_message(payload.as_ref()))));
    let description = case.description.clone();
    match outcome {
        Ok(()) => TestResult::Pass { name, description },
        Err(failure) => TestResult::Fail {
            name,
            description,
            failure,
        },
    }
}

pub fn partition_results(results: &[TestResult]) -> Summary {
    results
        .iter()
        .fold(Summary::default(), |mut summary, result| {
            match result {
                TestResult::Pass { .. } => summary.passed += 1,
                TestResult::Fail { .. } => summary.failed += 1,
                TestResult::Skipped { .. } => summary.skipped += 1,
            }
            summary
        })
}

fn skip_reason(name: &str, filter: Option<&str>) -> Option<String> {
    let filter = filter?;
    if name.to_lowercase().contains(filter) {
        None
    } else {
        Some(format!("Filtered out by substring: {}", filter))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::MismatchReport;
    use crate::diagnostic::ExpectedDiagnostic;

    fn suite() -> TestSuite {
        let mut group = TestSuite::new("compiler-fixtures");
        group.add_case(TestCase::new("ok", "ok.sx", Box::new(|| Ok(()))));
        group.add_case(TestCase::new(
            "mismatch",
            "mismatch.sx",
            Box::new(|| {
                Err(CaseFailure::Mismatch(MismatchReport::new(
                    vec![ExpectedDiagnostic::new("Warning", "a")],
                    vec![],
                )))
            }),
        ));
        group.add_case(TestCase::new(
            "boom",
            "boom.sx",
            Box::new(|| -> Result<(), CaseFailure> { panic!("analyzer exploded") }),
        ));
        group.add_case(TestCase::new("also_ok", "also_ok.sx", Box::new(|| Ok(()))));
        let mut root = TestSuite::new("master");
        root.add_suite(group);
        root
    }

    #[test]
    fn failures_stay_local_to_their_case() {
        let results = run_suite(&suite(), &RunConfig::default());
        assert_eq!(results.len(), 4);
        assert_eq!(
            partition_results(&results),
            Summary {
                passed: 2,
                failed: 2,
                skipped: 0
            }
        );
        assert!(matches!(results[3], TestResult::Pass { .. }));
    }

    #[test]
    fn panics_become_failures() {
        let results = run_suite(&suite(), &RunConfig::default());
        match &results[2] {
            TestResult::Fail {
                failure: CaseFailure::Panicked(message),
                name,
                ..
            } => {
                assert_eq!(name, "compiler-fixtures/boom");
                assert_eq!(message, "analyzer exploded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn filter_skips_everything_else() {
        let config = RunConfig {
            filter: Some("OK".to_string()),
        };
        let results = run_suite(&suite(), &config);
        let summary = partition_results(&results);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.skipped, 2);
        assert!(summary.success());
        assert_eq!(summary.total(), 4);
    }

    fn outcome(result: &TestResult) -> (String, &'static str) {
        let kind = match result {
            TestResult::Pass { .. } => "pass",
            TestResult::Fail { .. } => "fail",
            TestResult::Skipped { .. } => "skip",
        };
        (result.name().to_string(), kind)
    }

    #[test]
    fn concurrent_runs_match_sequential_outcomes() {
        let suite = suite();
        let sequential: Vec<_> = run_suite(&suite, &RunConfig::default())
            .iter()
            .map(outcome)
            .collect();

        let cases = suite.cases();
        let concurrent: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = cases
                .iter()
                .map(|(name, case)| scope.spawn(move || run_case(name.clone(), case)))
                .collect();
            handles
                .into_iter()
                .map(|handle| outcome(&handle.join().unwrap()))
                .collect()
        });

        assert_eq!(concurrent, sequential);
        assert_eq!(
            concurrent.iter().map(|(_, kind)| *kind).collect::<Vec<_>>(),
            ["pass", "fail", "fail", "pass"]
        );
    }
}
