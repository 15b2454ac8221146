//! Payer Accumulation Domain
//!
//! This crate applies parsed 277/277CA claim statuses to the accumulation
//! treatment mappings they refer to.
//!
//! # Flow
//!
//! ```text
//! X12Data277 -> classify(STC01-1) -> verify_status_to_update -> TreatmentMappingPort
//! ```
//!
//! A rejection always overwrites the stored status. Any other classification
//! only applies while the stored status is not already a failure.

pub mod status;
pub mod classifier;
pub mod ports;
pub mod updater;
pub mod processor;
pub mod error;

pub use status::{verify_status_to_update, TreatmentAccumulationStatus};
pub use classifier::{classify, ClaimStatusClassification, REJECTED_CLAIM_STATUS_CATEGORY_CODES};
pub use ports::{StatusUpdate, TreatmentMapping, TreatmentMappingPort};
pub use updater::{TreatmentMappingUpdater, UpdateOutcome};
pub use processor::{ClaimStatusProcessor, ProcessingSummary};
pub use error::AccumulationError;
