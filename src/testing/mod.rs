//! # Fixture Test Harness
//!
//! Discovery, registration and execution of diagnostic fixtures.
//!
//! The pieces line up as a pipeline:
//! 1. [`registrar`] validates [`options::Options`] and asks [`discovery`] for
//!    the fixture tree under `<testpath>/compiler-fixtures`.
//! 2. The registrar adapts that tree into a [`suite::TestSuite`], binding each
//!    fixture to a deferred [`executor::CaseExecutor`] call.
//! 3. [`runner`] executes the suite and collects per-case results.

pub mod discovery;
pub mod executor;
pub mod options;
pub mod registrar;
pub mod runner;
pub mod suite;

pub use discovery::{discover, DirectorySource, FixtureGroup, FixtureNode, FsSource, MemorySource};
pub use executor::{CaseExecutor, CaseFailure};
pub use options::{EntryOrder, Options};
pub use registrar::{register_all, register_from};
pub use runner::{partition_results, run_suite, RunConfig, Summary, TestResult};
pub use suite::{TestCase, TestSuite};
