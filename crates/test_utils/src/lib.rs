//! Test Utilities Crate
//!
//! Shared test infrastructure for the payer accumulation workspace.
//!
//! # Modules
//!
//! - `fixtures`: 277CA fixture files and an inline document builder
//! - `builders`: Treatment mapping builders and seeded mock ports
//! - `database`: Testcontainer PostgreSQL with the mapping schema
//! - `assertions`: Assertion helpers for parsed documents and mappings
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
