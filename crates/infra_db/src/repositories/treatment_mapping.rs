//! Accumulation treatment mapping repository
//!
//! PostgreSQL implementation of `TreatmentMappingPort`. Rows are looked up
//! and updated by `accumulation_unique_id`; this repository never inserts or
//! deletes mappings outside of test seeding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{AccumulationUniqueId, DomainPort, PortError};
use domain_accumulation::{StatusUpdate, TreatmentAccumulationStatus, TreatmentMapping, TreatmentMappingPort};

use crate::error::DatabaseError;

const ENTITY: &str = "AccumulationTreatmentMapping";

/// Database row for `accumulation_treatment_mapping`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TreatmentMappingRow {
    pub accumulation_unique_id: String,
    pub treatment_accumulation_status: String,
    pub response_code: Option<String>,
    pub row_error_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TreatmentMappingRow> for TreatmentMapping {
    type Error = DatabaseError;

    fn try_from(row: TreatmentMappingRow) -> Result<Self, Self::Error> {
        let accumulation_unique_id = AccumulationUniqueId::new(&row.accumulation_unique_id)
            .map_err(|e| DatabaseError::InvalidData(e.to_string()))?;
        let treatment_accumulation_status = row
            .treatment_accumulation_status
            .parse::<TreatmentAccumulationStatus>()
            .map_err(|e| DatabaseError::InvalidData(e.to_string()))?;

        Ok(TreatmentMapping {
            accumulation_unique_id,
            treatment_accumulation_status,
            response_code: row.response_code,
            row_error_reason: row.row_error_reason,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for accumulation treatment mappings
#[derive(Debug, Clone)]
pub struct PgTreatmentMappingRepository {
    pool: PgPool,
}

impl PgTreatmentMappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads a mapping by accumulation unique id
    pub async fn get(&self, id: &AccumulationUniqueId) -> Result<Option<TreatmentMapping>, DatabaseError> {
        let row = sqlx::query_as::<_, TreatmentMappingRow>(
            r#"
            SELECT
                accumulation_unique_id,
                treatment_accumulation_status,
                response_code,
                row_error_reason,
                updated_at
            FROM accumulation_treatment_mapping
            WHERE accumulation_unique_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        row.map(TreatmentMapping::try_from).transpose()
    }

    /// Writes status, response code, and error reason for an existing mapping
    pub async fn update(
        &self,
        id: &AccumulationUniqueId,
        update: &StatusUpdate,
    ) -> Result<TreatmentMapping, DatabaseError> {
        let row = sqlx::query_as::<_, TreatmentMappingRow>(
            r#"
            UPDATE accumulation_treatment_mapping
            SET
                treatment_accumulation_status = $2,
                response_code = $3,
                row_error_reason = $4,
                updated_at = NOW()
            WHERE accumulation_unique_id = $1
            RETURNING
                accumulation_unique_id,
                treatment_accumulation_status,
                response_code,
                row_error_reason,
                updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(update.treatment_accumulation_status.as_str())
        .bind(update.response_code.as_deref())
        .bind(update.row_error_reason.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?
        .ok_or_else(|| DatabaseError::not_found(ENTITY, id))?;

        TreatmentMapping::try_from(row)
    }

    /// Inserts a mapping row
    ///
    /// Mappings are owned by the accumulation file generation pipeline; this
    /// exists for seeding test databases and local environments.
    pub async fn insert(&self, mapping: &TreatmentMapping) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO accumulation_treatment_mapping (
                accumulation_unique_id,
                treatment_accumulation_status,
                response_code,
                row_error_reason,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(mapping.accumulation_unique_id.as_str())
        .bind(mapping.treatment_accumulation_status.as_str())
        .bind(mapping.response_code.as_deref())
        .bind(mapping.row_error_reason.as_deref())
        .bind(mapping.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(())
    }
}

impl DomainPort for PgTreatmentMappingRepository {}

#[async_trait]
impl TreatmentMappingPort for PgTreatmentMappingRepository {
    #[instrument(skip(self), fields(accumulation_unique_id = %id))]
    async fn find_by_accumulation_unique_id(
        &self,
        id: &AccumulationUniqueId,
    ) -> Result<Option<TreatmentMapping>, PortError> {
        let mapping = self.get(id).await?;
        debug!(found = mapping.is_some(), "Loaded accumulation treatment mapping");
        Ok(mapping)
    }

    #[instrument(skip(self, update), fields(accumulation_unique_id = %id, status = %update.treatment_accumulation_status))]
    async fn update_status(
        &self,
        id: &AccumulationUniqueId,
        update: StatusUpdate,
    ) -> Result<TreatmentMapping, PortError> {
        match self.update(id, &update).await {
            Ok(mapping) => Ok(mapping),
            Err(e) if e.is_not_found() => Err(PortError::not_found(ENTITY, id)),
            Err(e) => Err(e.into()),
        }
    }
}
