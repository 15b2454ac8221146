//! Core Kernel - Foundational types shared by the payer accumulation EDI pipeline
//!
//! This crate provides the building blocks used across all workspace crates:
//! - The port error type and marker traits for ports and adapters
//! - Strongly-typed identifiers for accumulation records
//! - An explicit retry combinator with randomized exponential backoff

pub mod identifiers;
pub mod ports;
pub mod retry;

pub use identifiers::{AccumulationUniqueId, IdentifierError, MAX_ACCUMULATION_UNIQUE_ID_LEN};
pub use ports::{DomainPort, PortError};
pub use retry::{retry_async, RetryPolicy};
