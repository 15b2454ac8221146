//! Treatment accumulation status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AccumulationError;

/// Lifecycle status of an accumulation treatment mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatmentAccumulationStatus {
    Paid,
    Waiting,
    RowError,
    Processed,
    Submitted,
    Skip,
    Refunded,
    Rejected,
    Accepted,
}

impl TreatmentAccumulationStatus {
    pub const ALL: [TreatmentAccumulationStatus; 9] = [
        Self::Paid,
        Self::Waiting,
        Self::RowError,
        Self::Processed,
        Self::Submitted,
        Self::Skip,
        Self::Refunded,
        Self::Rejected,
        Self::Accepted,
    ];

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "PAID",
            Self::Waiting => "WAITING",
            Self::RowError => "ROW_ERROR",
            Self::Processed => "PROCESSED",
            Self::Submitted => "SUBMITTED",
            Self::Skip => "SKIP",
            Self::Refunded => "REFUNDED",
            Self::Rejected => "REJECTED",
            Self::Accepted => "ACCEPTED",
        }
    }

    /// Failure statuses; once stored, only another failure may replace them
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::RowError | Self::Rejected)
    }
}

impl fmt::Display for TreatmentAccumulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreatmentAccumulationStatus {
    type Err = AccumulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AccumulationError::UnknownStatus(s.to_string()))
    }
}

/// Decides whether `new_status` may replace `current_status`
///
/// Failing transitions always win over any prior state. Succeeding
/// transitions only apply when the stored state is not already a failure.
pub fn verify_status_to_update(
    new_status: TreatmentAccumulationStatus,
    current_status: TreatmentAccumulationStatus,
) -> bool {
    new_status.is_failure() || !current_status.is_failure()
}
