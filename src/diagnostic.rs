//! # Diagnostic Values
//!
//! The two sides of every comparison: what an analyzer reports
//! ([`Diagnostic`]) and what a fixture expects ([`ExpectedDiagnostic`]).
//!
//! The kind is an opaque tag (`"TypeError"`, `"Warning"`, ...). Messages on
//! the actual side are optional; an absent message is not the same as an
//! empty one and renders as [`NO_MESSAGE`].

use std::fmt;

/// Rendering of a diagnostic that carries no message at all.
pub const NO_MESSAGE: &str = "NONE";

/// A diagnostic produced by an analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: String,
    pub message: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with a message.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: Some(message.into()),
        }
    }

    /// Creates a diagnostic that carries no message.
    pub fn bare(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: None,
        }
    }

    /// The message as it appears in reports and as it is compared against
    /// expectations: newlines escaped, or [`NO_MESSAGE`] when absent.
    pub fn rendered_message(&self) -> String {
        match &self.message {
            Some(message) => escape_newlines(message),
            None => NO_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.rendered_message())
    }
}

/// A diagnostic a fixture expects, taken verbatim from its trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDiagnostic {
    pub kind: String,
    pub message: String,
}

impl ExpectedDiagnostic {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ExpectedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Replaces every newline with the two-character sequence `\n`.
pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n")
}
