//! Tests for accumulation identifiers

use core_kernel::{AccumulationUniqueId, IdentifierError, MAX_ACCUMULATION_UNIQUE_ID_LEN};
use proptest::prelude::*;

#[test]
fn test_accumulation_unique_id_trims_whitespace() {
    let id = AccumulationUniqueId::new("  2RFAUCEKQY2ZFA4X9KEX \n").unwrap();
    assert_eq!(id.as_str(), "2RFAUCEKQY2ZFA4X9KEX");
    assert_eq!(id.to_string(), "2RFAUCEKQY2ZFA4X9KEX");
}

#[test]
fn test_accumulation_unique_id_rejects_empty() {
    assert_eq!(AccumulationUniqueId::new("   "), Err(IdentifierError::Empty));
    assert_eq!("".parse::<AccumulationUniqueId>(), Err(IdentifierError::Empty));
}

#[test]
fn test_accumulation_unique_id_length_limit() {
    let max = "X".repeat(MAX_ACCUMULATION_UNIQUE_ID_LEN);
    assert!(AccumulationUniqueId::new(&max).is_ok());

    let too_long = "X".repeat(MAX_ACCUMULATION_UNIQUE_ID_LEN + 1);
    assert_eq!(
        AccumulationUniqueId::new(&too_long),
        Err(IdentifierError::TooLong {
            len: MAX_ACCUMULATION_UNIQUE_ID_LEN + 1,
            max: MAX_ACCUMULATION_UNIQUE_ID_LEN,
        })
    );
}

#[test]
fn test_accumulation_unique_id_serde_transparent() {
    let id = AccumulationUniqueId::new("ABC123").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"ABC123\"");

    let parsed: AccumulationUniqueId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
    assert!(serde_json::from_str::<AccumulationUniqueId>("\"\"").is_err());
}

proptest! {
    #[test]
    fn prop_valid_ids_preserved(value in "[A-Z0-9]{1,128}") {
        let id = AccumulationUniqueId::new(&value).unwrap();
        prop_assert_eq!(id.as_str(), value.as_str());
    }
}
