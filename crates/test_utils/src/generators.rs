//! Property-Based Test Generators
//!
//! Proptest strategies for 277CA inputs that respect X12 constraints.

use proptest::prelude::*;

use domain_accumulation::{TreatmentAccumulationStatus, REJECTED_CLAIM_STATUS_CATEGORY_CODES};

/// Strategy for accumulation unique ids as they appear in TRN02
pub fn trace_number_strategy() -> impl Strategy<Value = String> {
    "[A-Z0-9]{1,30}"
}

/// Strategy for category codes on the rejected table
pub fn rejected_category_code_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(REJECTED_CLAIM_STATUS_CATEGORY_CODES.to_vec())
}

/// Strategy for category codes that classify as submitted
pub fn submitted_category_code_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{1,2}[0-9]{1,2}".prop_filter("code must not be on the rejected table", |code| {
        !REJECTED_CLAIM_STATUS_CATEGORY_CODES.contains(&code.as_str())
    })
}

/// Strategy for any treatment accumulation status
pub fn status_strategy() -> impl Strategy<Value = TreatmentAccumulationStatus> {
    proptest::sample::select(TreatmentAccumulationStatus::ALL.to_vec())
}

/// Strategy for free-text element values that never contain default delimiters
pub fn element_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .-]{0,20}"
}
