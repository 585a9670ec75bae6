//! # Host Test Tree
//!
//! The registration surface of the runner: named suites holding named test
//! cases, each case carrying a deferred closure. Nothing here knows about
//! fixtures; the registrar adapts a discovered fixture tree into this shape.

use std::fmt;

use crate::testing::executor::CaseFailure;

/// Deferred body of a test case.
pub type CaseFn = Box<dyn Fn() -> Result<(), CaseFailure> + Send + Sync>;

pub struct TestCase {
    pub name: String,
    pub description: String,
    run: CaseFn,
}

impl TestCase {
    pub fn new(name: impl Into<String>, description: impl Into<String>, run: CaseFn) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            run,
        }
    }

    /// Runs the case body. Each call is independent of every other.
    pub fn run(&self) -> Result<(), CaseFailure> {
        (self.run)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum SuiteEntry {
    Suite(TestSuite),
    Case(TestCase),
}

#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub entries: Vec<SuiteEntry>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn add_suite(&mut self, suite: TestSuite) {
        self.entries.push(SuiteEntry::Suite(suite));
    }

    pub fn add_case(&mut self, case: TestCase) {
        self.entries.push(SuiteEntry::Case(case));
    }

    pub fn case_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                SuiteEntry::Suite(suite) => suite.case_count(),
                SuiteEntry::Case(_) => 1,
            })
            .sum()
    }

    /// Every case below this suite with its `/`-joined qualified name,
    /// depth first, in registration order. The suite's own name is not part
    /// of the qualified names.
    pub fn cases(&self) -> Vec<(String, &TestCase)> {
        let mut out = Vec::new();
        collect_cases(self, "", &mut out);
        out
    }
}

fn collect_cases<'a>(suite: &'a TestSuite, prefix: &str, out: &mut Vec<(String, &'a TestCase)>) {
    for entry in &suite.entries {
        match entry {
            SuiteEntry::Suite(child) => {
                collect_cases(child, &qualify(prefix, &child.name), out);
            }
            SuiteEntry::Case(case) => out.push((qualify(prefix, &case.name), case)),
        }
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}
