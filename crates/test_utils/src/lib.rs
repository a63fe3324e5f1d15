//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! settlement apportionment test suite.
//!
//! # Modules
//!
//! - `fixtures`: Worked settlement scenarios and matching JSON bodies
//! - `builders`: Builder patterns for settlement drafts
//! - `assertions`: Custom assertion helpers for money and breakdowns
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
