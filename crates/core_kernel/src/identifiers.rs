//! Strongly-typed identifiers for accumulation records
//!
//! The accumulation unique id is the correlation key carried in the TRN02
//! element of a 277/277CA response. It links the claim status back to the
//! accumulation row created when the claim was submitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of an accumulation unique id, matching the mapping table column
pub const MAX_ACCUMULATION_UNIQUE_ID_LEN: usize = 128;

/// Errors raised when constructing an identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Identifier is empty")]
    Empty,

    #[error("Identifier is {len} characters, maximum is {max}")]
    TooLong { len: usize, max: usize },
}

/// Correlation key linking a claim status response to its accumulation row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccumulationUniqueId(String);

impl AccumulationUniqueId {
    /// Creates an identifier, trimming surrounding whitespace
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_ACCUMULATION_UNIQUE_ID_LEN {
            return Err(IdentifierError::TooLong {
                len,
                max: MAX_ACCUMULATION_UNIQUE_ID_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccumulationUniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccumulationUniqueId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccumulationUniqueId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccumulationUniqueId> for String {
    fn from(id: AccumulationUniqueId) -> String {
        id.0
    }
}

impl AsRef<str> for AccumulationUniqueId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
