//! EDI domain errors

use thiserror::Error;

/// Errors that can occur in the EDI domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdiError {
    #[error("Invalid delimiters: {0}")]
    InvalidDelimiters(String),
}
