//! Claim status processor
//!
//! Walks the claims of a parsed 277 document in file order, classifies each
//! complete record and hands it to the updater. Incomplete records and port
//! failures are logged and counted; they never stop the rest of the file.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use domain_edi::X12Data277;

use crate::classifier::{classify, ClaimStatusClassification};
use crate::updater::{TreatmentMappingUpdater, UpdateOutcome};

/// Counters describing one processed document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub total_claims: usize,
    pub rejected: usize,
    pub submitted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub not_found: usize,
    pub skipped_incomplete: usize,
    pub failed: usize,
}

impl ProcessingSummary {
    /// Adds another summary's counters to this one
    pub fn merge(&mut self, other: &ProcessingSummary) {
        self.total_claims += other.total_claims;
        self.rejected += other.rejected;
        self.submitted += other.submitted;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.not_found += other.not_found;
        self.skipped_incomplete += other.skipped_incomplete;
        self.failed += other.failed;
    }
}

/// Applies parsed claim statuses to treatment mappings
#[derive(Debug, Clone)]
pub struct ClaimStatusProcessor {
    updater: TreatmentMappingUpdater,
}

impl ClaimStatusProcessor {
    pub fn new(updater: TreatmentMappingUpdater) -> Self {
        Self { updater }
    }

    /// Processes every claim of a document
    pub async fn process(&self, document: &X12Data277) -> ProcessingSummary {
        let mut summary = ProcessingSummary {
            total_claims: document.claims.len(),
            ..Default::default()
        };

        for (index, claim) in document.claims.iter().enumerate() {
            let Some((tracking, status)) = claim.parts() else {
                error!(
                    claim_index = index,
                    has_tracking = claim.claim_status_tracking.is_some(),
                    has_status = claim.claim_level_status.is_some(),
                    "Incomplete claim status record, skipping"
                );
                summary.skipped_incomplete += 1;
                continue;
            };

            let category_code = status.health_care_claim_status_category_code.as_str();
            let classification = classify(category_code);
            match classification {
                ClaimStatusClassification::Rejected => summary.rejected += 1,
                ClaimStatusClassification::Submitted => summary.submitted += 1,
            }

            let result = self
                .updater
                .update(
                    tracking.accumulation_unique_id(),
                    classification.into(),
                    category_code,
                    &status.claim_status_code,
                )
                .await;

            match result {
                Ok(UpdateOutcome::Updated { .. }) => summary.updated += 1,
                Ok(UpdateOutcome::Unchanged { .. }) => summary.unchanged += 1,
                Ok(UpdateOutcome::NotFound) => summary.not_found += 1,
                Err(e) => {
                    error!(
                        claim_index = index,
                        accumulation_unique_id = tracking.accumulation_unique_id(),
                        error = %e,
                        "Failed to apply claim status"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            total = summary.total_claims,
            updated = summary.updated,
            unchanged = summary.unchanged,
            not_found = summary.not_found,
            skipped = summary.skipped_incomplete,
            failed = summary.failed,
            "Processed claim status document"
        );
        summary
    }
}
