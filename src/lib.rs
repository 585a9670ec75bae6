pub use crate::errors::{FixtureError, HarnessError};

pub mod analyzer;
pub mod cli;
pub mod compare;
pub mod diagnostic;
pub mod errors;
pub mod fixture;
pub mod testing;
