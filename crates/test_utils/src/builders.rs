//! Test Data Builders
//!
//! Builders for accumulation treatment mappings and pre-seeded mock ports.
//! Tests specify only the fields they care about.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use core_kernel::AccumulationUniqueId;
use domain_accumulation::ports::mock::MockTreatmentMappingPort;
use domain_accumulation::{TreatmentAccumulationStatus, TreatmentMapping};

/// Builder for constructing treatment mapping rows
#[derive(Debug, Clone)]
pub struct TreatmentMappingBuilder {
    accumulation_unique_id: String,
    status: TreatmentAccumulationStatus,
    response_code: Option<String>,
    row_error_reason: Option<String>,
    updated_at: DateTime<Utc>,
}

impl Default for TreatmentMappingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreatmentMappingBuilder {
    /// Creates a SUBMITTED mapping for the sample trace number
    pub fn new() -> Self {
        Self {
            accumulation_unique_id: crate::fixtures::SAMPLE_TRACE_NUMBER.to_string(),
            status: TreatmentAccumulationStatus::Submitted,
            response_code: None,
            row_error_reason: None,
            updated_at: Utc
                .with_ymd_and_hms(2024, 10, 20, 12, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.accumulation_unique_id = id.into();
        self
    }

    pub fn with_status(mut self, status: TreatmentAccumulationStatus) -> Self {
        self.status = status;
        self
    }

    /// Records a previous payer response on the row
    pub fn with_response(mut self, response_code: impl Into<String>, row_error_reason: Option<&str>) -> Self {
        self.response_code = Some(response_code.into());
        self.row_error_reason = row_error_reason.map(str::to_string);
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Builds the mapping
    ///
    /// # Panics
    ///
    /// Panics if the id is empty or longer than 128 characters
    pub fn build(self) -> TreatmentMapping {
        let id = AccumulationUniqueId::new(&self.accumulation_unique_id)
            .expect("builder id must be a valid accumulation unique id");
        TreatmentMapping {
            accumulation_unique_id: id,
            treatment_accumulation_status: self.status,
            response_code: self.response_code,
            row_error_reason: self.row_error_reason,
            updated_at: self.updated_at,
        }
    }
}

/// Creates a mock port seeded with one mapping per `(id, status)` pair
pub fn mock_port_with(rows: &[(&str, TreatmentAccumulationStatus)]) -> Arc<MockTreatmentMappingPort> {
    let mappings = rows.iter().map(|(id, status)| {
        TreatmentMappingBuilder::new()
            .with_id(*id)
            .with_status(*status)
            .build()
    });
    Arc::new(MockTreatmentMappingPort::with_mappings(mappings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_is_submitted_sample() {
        let mapping = TreatmentMappingBuilder::new().build();

        assert_eq!(mapping.accumulation_unique_id.as_str(), "2RFAUCEKQY2ZFA4X9KEX");
        assert_eq!(mapping.treatment_accumulation_status, TreatmentAccumulationStatus::Submitted);
        assert!(mapping.response_code.is_none());
    }

    #[test]
    fn test_with_response() {
        let mapping = TreatmentMappingBuilder::new()
            .with_status(TreatmentAccumulationStatus::Rejected)
            .with_response("A7", Some("A7:562"))
            .build();

        assert_eq!(mapping.response_code.as_deref(), Some("A7"));
        assert_eq!(mapping.row_error_reason.as_deref(), Some("A7:562"));
    }

    #[tokio::test]
    async fn test_mock_port_with_rows() {
        let port = mock_port_with(&[
            ("ID1", TreatmentAccumulationStatus::Processed),
            ("ID2", TreatmentAccumulationStatus::RowError),
        ]);

        let stored = port.get("ID2").await.unwrap();
        assert_eq!(stored.treatment_accumulation_status, TreatmentAccumulationStatus::RowError);
    }
}
