//! # Analyzer Seam
//!
//! The compiler front-end under test sits behind [`Analyzer`]: source text
//! in, ordered diagnostics out. The harness never inspects the source itself.
//!
//! Implementations must build any state they need inside
//! [`Analyzer::analyze`]; test cases may be invoked in any order and from any
//! thread, so nothing may carry over between calls.

use crate::diagnostic::Diagnostic;

pub mod sexpr;

pub use sexpr::SexprAnalyzer;

/// Switches controlling how much an analyzer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Report warnings alongside errors.
    pub report_warnings: bool,
    /// Keep going after the first error instead of stopping there.
    pub allow_multiple_errors: bool,
}

impl AnalysisConfig {
    /// Full diagnostic reporting. Fixtures are always analyzed this way.
    pub const FULL: Self = Self {
        report_warnings: true,
        allow_multiple_errors: true,
    };
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::FULL
    }
}

/// A compiler front-end that turns source text into diagnostics.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, source: &str, config: &AnalysisConfig) -> Vec<Diagnostic>;
}

impl<F> Analyzer for F
where
    F: Fn(&str, &AnalysisConfig) -> Vec<Diagnostic> + Send + Sync,
{
    fn analyze(&self, source: &str, config: &AnalysisConfig) -> Vec<Diagnostic> {
        self(source, config)
    }
}
