//! # Fixture Loading
//!
//! A fixture is a source file followed by a trailer of expected diagnostics:
//!
//! ```text
//! (define x 1)
//! (define x 2)
//! // ----
//! // DeclarationError: Identifier already declared.
//! ```
//!
//! Everything before the `// ----` separator line is source text handed to
//! the analyzer untouched. A fixture without a separator expects no
//! diagnostics at all.

use std::fs;
use std::path::{Path, PathBuf};

use miette::NamedSource;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostic::ExpectedDiagnostic;
use crate::errors::FixtureError;

/// Line separating the source from its expectations.
pub const TRAILER_SEPARATOR: &str = "// ----";

static EXPECTATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^//\s*([A-Za-z_][A-Za-z0-9_]*):\s?(.*)$").expect("expectation pattern is valid")
});

/// A fixture read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub path: PathBuf,
    pub source: String,
    pub expectations: Vec<ExpectedDiagnostic>,
}

/// Turns a fixture path into source text and expectations.
pub trait FixtureParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<Fixture, FixtureError>;
}

/// Parser for the `// ----` trailer format.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrailerParser;

impl TrailerParser {
    /// Splits already-loaded fixture content. `path` is used for error
    /// reporting and is stored on the returned [`Fixture`].
    pub fn parse_str(&self, path: &Path, content: &str) -> Result<Fixture, FixtureError> {
        let Some((source_end, trailer_start)) = find_separator(content) else {
            return Ok(Fixture {
                path: path.to_path_buf(),
                source: content.to_string(),
                expectations: Vec::new(),
            });
        };

        let mut expectations = Vec::new();
        let mut offset = trailer_start;
        let first_line = content[..trailer_start].lines().count() + 1;

        for (index, raw) in content[trailer_start..].split_inclusive('\n').enumerate() {
            let line = raw.trim_end_matches(['\n', '\r']);
            // Trailing whitespace belongs to the expected message.
            let indented = line.trim_start();
            let blank = indented.trim_end();
            if !(blank.is_empty() || blank == "//") {
                let Some(caps) = EXPECTATION_LINE.captures(indented) else {
                    return Err(FixtureError::MalformedExpectation {
                        line: first_line + index,
                        src: NamedSource::new(path.display().to_string(), content.to_string()),
                        span: (offset, line.len()).into(),
                    });
                };
                expectations.push(ExpectedDiagnostic::new(&caps[1], &caps[2]));
            }
            offset += raw.len();
        }

        Ok(Fixture {
            path: path.to_path_buf(),
            source: content[..source_end].to_string(),
            expectations,
        })
    }
}

impl FixtureParser for TrailerParser {
    fn parse(&self, path: &Path) -> Result<Fixture, FixtureError> {
        let content = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(path, &content)
    }
}

/// Byte offsets of the end of the source and the start of the trailer.
fn find_separator(content: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for raw in content.split_inclusive('\n') {
        if raw.trim_end() == TRAILER_SEPARATOR {
            return Some((offset, offset + raw.len()));
        }
        offset += raw.len();
    }
    None
}
