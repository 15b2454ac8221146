//! Accumulation domain errors

use thiserror::Error;

/// Errors that can occur in the accumulation domain
#[derive(Debug, Error)]
pub enum AccumulationError {
    #[error("Unknown treatment accumulation status: {0}")]
    UnknownStatus(String),
}
