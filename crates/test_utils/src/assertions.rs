//! Custom Test Assertions
//!
//! Assertion helpers for parsed documents and mapping rows that give more
//! meaningful failure messages than bare `assert_eq!`.

use domain_accumulation::{TreatmentAccumulationStatus, TreatmentMapping};
use domain_edi::X12Data277;

/// Asserts the trace numbers of a document's claims, in file order
///
/// Claims without tracking information appear as `None`.
pub fn assert_claim_trace_numbers(document: &X12Data277, expected: &[Option<&str>]) {
    let actual: Vec<Option<&str>> = document
        .claims
        .iter()
        .map(|claim| {
            claim
                .claim_status_tracking
                .as_ref()
                .map(|t| t.referenced_transaction_trace_number.as_str())
        })
        .collect();

    assert_eq!(
        actual, expected,
        "Claim trace numbers differ: actual={:?}, expected={:?}",
        actual, expected
    );
}

/// Asserts the category codes of a document's claims, in file order
pub fn assert_claim_category_codes(document: &X12Data277, expected: &[Option<&str>]) {
    let actual: Vec<Option<&str>> = document
        .claims
        .iter()
        .map(|claim| {
            claim
                .claim_level_status
                .as_ref()
                .map(|s| s.health_care_claim_status_category_code.as_str())
        })
        .collect();

    assert_eq!(
        actual, expected,
        "Claim category codes differ: actual={:?}, expected={:?}",
        actual, expected
    );
}

/// Asserts a mapping's status and recorded response
pub fn assert_mapping_state(
    mapping: &TreatmentMapping,
    status: TreatmentAccumulationStatus,
    response_code: Option<&str>,
    row_error_reason: Option<&str>,
) {
    assert_eq!(
        mapping.treatment_accumulation_status, status,
        "Unexpected status for {}",
        mapping.accumulation_unique_id
    );
    assert_eq!(
        mapping.response_code.as_deref(),
        response_code,
        "Unexpected response code for {}",
        mapping.accumulation_unique_id
    );
    assert_eq!(
        mapping.row_error_reason.as_deref(),
        row_error_reason,
        "Unexpected row error reason for {}",
        mapping.accumulation_unique_id
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{MIXED_277CA, SAMPLE_277CA, SAMPLE_TRACE_NUMBER};
    use domain_edi::parse_277;

    #[test]
    fn test_sample_trace_numbers() {
        let document = parse_277(SAMPLE_277CA);
        assert_claim_trace_numbers(&document, &[Some(SAMPLE_TRACE_NUMBER), Some(SAMPLE_TRACE_NUMBER)]);
        assert_claim_category_codes(&document, &[Some("A1"), Some("A4")]);
    }

    #[test]
    fn test_mixed_category_codes() {
        let document = parse_277(MIXED_277CA);
        assert_claim_category_codes(&document, &[Some("A2"), Some("A2"), Some("A7"), None]);
    }

    #[test]
    #[should_panic(expected = "Claim trace numbers differ")]
    fn test_mismatch_panics() {
        let document = parse_277(SAMPLE_277CA);
        assert_claim_trace_numbers(&document, &[Some("OTHER")]);
    }
}
