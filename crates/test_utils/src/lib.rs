//! Test Utilities Crate
//!
//! Shared test infrastructure for the expense-sharing workspace.
//!
//! # Modules
//!
//! - `fixtures`: Fixed money amounts, dates and identifiers
//! - `builders`: A group builder that produces snapshots or a seeded in-memory ledger
//! - `assertions`: Assertion helpers for money and settlements
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
