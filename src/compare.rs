//! # Diagnostic Comparison
//!
//! Strict, positional comparison of an expected diagnostic list against the
//! list an analyzer actually produced.
//!
//! Two lists match only when they have the same length and every index agrees
//! on both kind and rendered message. There is no alignment, no multiset
//! matching and no fuzzy text matching: diagnostic order is part of the
//! behaviour under test, so a permutation of a correct list is a mismatch.

use std::fmt;

use crate::diagnostic::{Diagnostic, ExpectedDiagnostic};

/// Outcome of [`compare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match,
    Mismatch(MismatchReport),
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }
}

/// Both sides of a failed comparison.
///
/// The [`Display`](fmt::Display) form is the two-section report attached to
/// a failing test case:
///
/// ```text
/// Test expectation mismatch.
/// Expected result:
///     TypeError: Invalid type
/// Obtained result:
///     Success
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchReport {
    expected: Vec<ExpectedDiagnostic>,
    obtained: Vec<Diagnostic>,
}

impl MismatchReport {
    pub fn new(expected: Vec<ExpectedDiagnostic>, obtained: Vec<Diagnostic>) -> Self {
        Self { expected, obtained }
    }

    pub fn expected(&self) -> &[ExpectedDiagnostic] {
        &self.expected
    }

    pub fn obtained(&self) -> &[Diagnostic] {
        &self.obtained
    }

    /// Index of the first entry where the lists disagree. When one list is a
    /// prefix of the other this is the length of the shorter one.
    pub fn first_divergence(&self) -> Option<usize> {
        let shared = self.expected.len().min(self.obtained.len());
        (0..shared)
            .find(|&i| !entry_matches(&self.expected[i], &self.obtained[i]))
            .or_else(|| (self.expected.len() != self.obtained.len()).then_some(shared))
    }

    /// The "Expected result" section body, one line per entry.
    pub fn expected_section(&self) -> String {
        section(self.expected.iter().map(|e| (e.kind.as_str(), e.message.clone())))
    }

    /// The "Obtained result" section body, one line per entry.
    pub fn obtained_section(&self) -> String {
        section(
            self.obtained
                .iter()
                .map(|d| (d.kind.as_str(), d.rendered_message())),
        )
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Test expectation mismatch.\nExpected result:\n")?;
        f.write_str(&self.expected_section())?;
        f.write_str("Obtained result:\n")?;
        f.write_str(&self.obtained_section())
    }
}

/// Compares the expected diagnostics of a fixture with what the analyzer
/// produced.
pub fn compare(expected: &[ExpectedDiagnostic], obtained: &[Diagnostic]) -> Comparison {
    let matches = expected.len() == obtained.len()
        && expected
            .iter()
            .zip(obtained)
            .all(|(exp, diag)| entry_matches(exp, diag));

    if matches {
        Comparison::Match
    } else {
        Comparison::Mismatch(MismatchReport::new(expected.to_vec(), obtained.to_vec()))
    }
}

fn entry_matches(expected: &ExpectedDiagnostic, obtained: &Diagnostic) -> bool {
    expected.kind == obtained.kind && expected.message == obtained.rendered_message()
}

fn section<'a>(entries: impl ExactSizeIterator<Item = (&'a str, String)>) -> String {
    if entries.len() == 0 {
        return "\tSuccess\n".to_string();
    }
    entries
        .map(|(kind, message)| format!("\t{}: {}\n", kind, message))
        .collect()
}
