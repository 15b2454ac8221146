//! Repository implementations for domain ports
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! domain types.

pub mod treatment_mapping;

pub use treatment_mapping::{PgTreatmentMappingRepository, TreatmentMappingRow};
