//! Treatment mapping updater
//!
//! Applies one classified claim status to the mapping row keyed by its
//! accumulation unique id. A missing row is a data-integrity problem: it is
//! logged and nothing is written.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use core_kernel::{AccumulationUniqueId, PortError};

use crate::ports::{StatusUpdate, TreatmentMappingPort};
use crate::status::{verify_status_to_update, TreatmentAccumulationStatus};

/// Result of applying a claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The row was written
    Updated {
        previous: TreatmentAccumulationStatus,
        current: TreatmentAccumulationStatus,
    },
    /// The stored status takes precedence; nothing was written
    Unchanged {
        current: TreatmentAccumulationStatus,
    },
    /// No row exists for the id; nothing was written
    NotFound,
}

/// Updates accumulation treatment mappings from claim statuses
#[derive(Clone)]
pub struct TreatmentMappingUpdater {
    port: Arc<dyn TreatmentMappingPort>,
}

impl std::fmt::Debug for TreatmentMappingUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreatmentMappingUpdater").finish_non_exhaustive()
    }
}

impl TreatmentMappingUpdater {
    pub fn new(port: Arc<dyn TreatmentMappingPort>) -> Self {
        Self { port }
    }

    /// Applies `new_status` to the mapping for `accumulation_unique_id`
    ///
    /// # Arguments
    ///
    /// * `accumulation_unique_id` - TRN02 of the claim-level trace
    /// * `new_status` - The classified status
    /// * `response_code` - STC01-1 category code
    /// * `detail_code` - STC01-2 claim status code
    ///
    /// # Errors
    ///
    /// Returns `PortError::Validation` for an empty or oversized id, and any
    /// error raised by the port itself.
    pub async fn update(
        &self,
        accumulation_unique_id: &str,
        new_status: TreatmentAccumulationStatus,
        response_code: &str,
        detail_code: &str,
    ) -> Result<UpdateOutcome, PortError> {
        let id = AccumulationUniqueId::new(accumulation_unique_id)
            .map_err(|e| PortError::validation_field(e.to_string(), "accumulation_unique_id"))?;

        let Some(mapping) = self.port.find_by_accumulation_unique_id(&id).await? else {
            error!(
                accumulation_unique_id = %id,
                new_status = %new_status,
                "No accumulation treatment mapping found for claim status"
            );
            return Ok(UpdateOutcome::NotFound);
        };

        let current = mapping.treatment_accumulation_status;
        if !verify_status_to_update(new_status, current) {
            info!(
                accumulation_unique_id = %id,
                current_status = %current,
                new_status = %new_status,
                "Stored status takes precedence, skipping update"
            );
            return Ok(UpdateOutcome::Unchanged { current });
        }

        let update = StatusUpdate::from_claim_status(new_status, response_code, detail_code);
        let updated = self.port.update_status(&id, update).await?;

        info!(
            accumulation_unique_id = %id,
            previous_status = %current,
            new_status = %updated.treatment_accumulation_status,
            response_code,
            "Updated accumulation treatment mapping"
        );
        Ok(UpdateOutcome::Updated {
            previous: current,
            current: updated.treatment_accumulation_status,
        })
    }
}
