//! Accumulation Treatment Mapping Port
//!
//! The mapping rows are created by the accumulation file generation pipeline
//! when a claim is submitted. This core only reads a row by its accumulation
//! unique id and conditionally updates it; it never creates or deletes rows.
//!
//! # Adapters
//!
//! - **Internal Adapter**: `infra_db::PgTreatmentMappingRepository` (PostgreSQL)
//! - **Mock Adapter**: `mock::MockTreatmentMappingPort` for tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccumulationUniqueId, DomainPort, PortError};

use crate::status::TreatmentAccumulationStatus;

/// An accumulation treatment mapping row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentMapping {
    pub accumulation_unique_id: AccumulationUniqueId,
    pub treatment_accumulation_status: TreatmentAccumulationStatus,
    pub response_code: Option<String>,
    pub row_error_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TreatmentMapping {
    /// Creates a mapping with no response recorded yet
    pub fn new(accumulation_unique_id: AccumulationUniqueId, status: TreatmentAccumulationStatus) -> Self {
        Self {
            accumulation_unique_id,
            treatment_accumulation_status: status,
            response_code: None,
            row_error_reason: None,
            updated_at: Utc::now(),
        }
    }
}

/// Fields written when a claim status is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub treatment_accumulation_status: TreatmentAccumulationStatus,
    pub response_code: Option<String>,
    pub row_error_reason: Option<String>,
}

impl StatusUpdate {
    /// Builds the update for a classified claim status
    ///
    /// The category code is recorded as the response code. Failure statuses
    /// also record `<category>:<detail>` as the row error reason; other
    /// statuses clear it.
    pub fn from_claim_status(
        status: TreatmentAccumulationStatus,
        category_code: &str,
        detail_code: &str,
    ) -> Self {
        let category_code = category_code.trim();
        let detail_code = detail_code.trim();

        let response_code = (!category_code.is_empty()).then(|| category_code.to_string());
        let row_error_reason = status
            .is_failure()
            .then(|| format!("{}:{}", category_code, detail_code));

        Self {
            treatment_accumulation_status: status,
            response_code,
            row_error_reason,
        }
    }
}

/// Port for reading and updating accumulation treatment mappings
#[async_trait]
pub trait TreatmentMappingPort: DomainPort {
    /// Loads the mapping for an accumulation unique id
    async fn find_by_accumulation_unique_id(
        &self,
        id: &AccumulationUniqueId,
    ) -> Result<Option<TreatmentMapping>, PortError>;

    /// Writes a status update to an existing mapping
    ///
    /// Returns `PortError::NotFound` when no row exists for the id.
    async fn update_status(
        &self,
        id: &AccumulationUniqueId,
        update: StatusUpdate,
    ) -> Result<TreatmentMapping, PortError>;
}

/// Mock implementation of TreatmentMappingPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of TreatmentMappingPort
    #[derive(Debug, Default)]
    pub struct MockTreatmentMappingPort {
        mappings: RwLock<HashMap<AccumulationUniqueId, TreatmentMapping>>,
        updates: RwLock<Vec<(AccumulationUniqueId, StatusUpdate)>>,
    }

    impl MockTreatmentMappingPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a mock port seeded with mappings
        pub fn with_mappings(mappings: impl IntoIterator<Item = TreatmentMapping>) -> Self {
            let map = mappings
                .into_iter()
                .map(|m| (m.accumulation_unique_id.clone(), m))
                .collect();
            Self {
                mappings: RwLock::new(map),
                updates: RwLock::new(Vec::new()),
            }
        }

        /// Inserts or replaces a mapping
        pub async fn insert(&self, mapping: TreatmentMapping) {
            self.mappings
                .write()
                .await
                .insert(mapping.accumulation_unique_id.clone(), mapping);
        }

        /// Returns the stored mapping
        pub async fn get(&self, id: &str) -> Option<TreatmentMapping> {
            let id = AccumulationUniqueId::new(id).ok()?;
            self.mappings.read().await.get(&id).cloned()
        }

        /// Returns every update written, in order
        pub async fn updates(&self) -> Vec<(AccumulationUniqueId, StatusUpdate)> {
            self.updates.read().await.clone()
        }
    }

    impl DomainPort for MockTreatmentMappingPort {}

    #[async_trait]
    impl TreatmentMappingPort for MockTreatmentMappingPort {
        async fn find_by_accumulation_unique_id(
            &self,
            id: &AccumulationUniqueId,
        ) -> Result<Option<TreatmentMapping>, PortError> {
            Ok(self.mappings.read().await.get(id).cloned())
        }

        async fn update_status(
            &self,
            id: &AccumulationUniqueId,
            update: StatusUpdate,
        ) -> Result<TreatmentMapping, PortError> {
            let mut mappings = self.mappings.write().await;
            let mapping = mappings
                .get_mut(id)
                .ok_or_else(|| PortError::not_found("AccumulationTreatmentMapping", id))?;

            mapping.treatment_accumulation_status = update.treatment_accumulation_status;
            mapping.response_code = update.response_code.clone();
            mapping.row_error_reason = update.row_error_reason.clone();
            mapping.updated_at = Utc::now();
            let updated = mapping.clone();

            self.updates.write().await.push((id.clone(), update));
            Ok(updated)
        }
    }
}
