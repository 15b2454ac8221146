//! Claim status classification
//!
//! The health care claim status category code (STC01-1) decides whether a
//! submitted accumulation was rejected by the payer. Codes outside the
//! rejection table are treated as still progressing.

use serde::{Deserialize, Serialize};

use crate::status::TreatmentAccumulationStatus;

/// Category codes signifying a rejected or unprocessable claim
pub const REJECTED_CLAIM_STATUS_CATEGORY_CODES: [&str; 17] = [
    "A3", "A4", "A6", "A7", "A8", "DR03", "DR04", "DR05", "DR06", "DR07", "E0", "E1", "E2",
    "E3", "E4", "F2", "D0",
];

/// Outcome of classifying a claim status category code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatusClassification {
    Rejected,
    Submitted,
}

impl From<ClaimStatusClassification> for TreatmentAccumulationStatus {
    fn from(classification: ClaimStatusClassification) -> Self {
        match classification {
            ClaimStatusClassification::Rejected => TreatmentAccumulationStatus::Rejected,
            ClaimStatusClassification::Submitted => TreatmentAccumulationStatus::Submitted,
        }
    }
}

/// Classifies a claim status category code
pub fn classify(category_code: &str) -> ClaimStatusClassification {
    let code = category_code.trim();
    if REJECTED_CLAIM_STATUS_CATEGORY_CODES.contains(&code) {
        ClaimStatusClassification::Rejected
    } else {
        ClaimStatusClassification::Submitted
    }
}
