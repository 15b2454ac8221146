//! 277/277CA claim status document model
//!
//! A parsed file is an `X12Data277`: the envelope headers plus one
//! `ClaimData` per claim-level status the file reports. Documents are built
//! once by the parser and never mutated afterwards.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Implementation convention reference of the 277CA claim acknowledgment
pub const CLAIM_ACKNOWLEDGMENT_VERSION: &str = "005010X214";

/// TRN01 value of a referenced transaction trace (the claim-level trace)
pub const REFERENCED_TRANSACTION_TRACE: &str = "2";

/// Interchange control header (ISA)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterchangeControlHeader {
    /// ISA01
    pub authorization_information_qualifier: String,
    /// ISA02
    pub authorization_information: String,
    /// ISA03
    pub security_information_qualifier: String,
    /// ISA04
    pub security_information: String,
    /// ISA05
    pub interchange_sender_id_qualifier: String,
    /// ISA06
    pub interchange_sender_id: String,
    /// ISA07
    pub interchange_receiver_id_qualifier: String,
    /// ISA08
    pub interchange_receiver_id: String,
    /// ISA09, YYMMDD
    pub interchange_date: String,
    /// ISA10, HHMM
    pub interchange_time: String,
    /// ISA11
    pub repetition_separator: String,
    /// ISA12
    pub interchange_control_version_number: String,
    /// ISA13
    pub interchange_control_number: String,
    /// ISA14
    pub acknowledgment_requested: String,
    /// ISA15, `P` for production or `T` for test
    pub usage_indicator: String,
    /// ISA16
    pub component_element_separator: String,
}

impl InterchangeControlHeader {
    /// Returns true for production interchanges
    pub fn is_production(&self) -> bool {
        self.usage_indicator == "P"
    }

    /// Combines ISA09 and ISA10 when both are well formed
    pub fn interchange_datetime(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(&self.interchange_date, "%y%m%d").ok()?;
        let time = NaiveTime::parse_from_str(&self.interchange_time, "%H%M").ok()?;
        Some(date.and_time(time))
    }
}

/// Functional group header (GS)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalGroupHeader {
    /// GS01, `HN` for 277
    pub functional_identifier_code: String,
    /// GS02
    pub application_sender_code: String,
    /// GS03
    pub application_receiver_code: String,
    /// GS04, CCYYMMDD
    pub date: String,
    /// GS05
    pub time: String,
    /// GS06
    pub group_control_number: String,
    /// GS07
    pub responsible_agency_code: String,
    /// GS08
    pub version_identifier_code: String,
}

/// Transaction set header (ST)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSetHeader {
    /// ST01, `277`
    pub transaction_set_identifier_code: String,
    /// ST02
    pub transaction_set_control_number: String,
    /// ST03, e.g. `005010X214`
    pub implementation_convention_reference: String,
}

/// Which flavour of 277 a transaction set is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// 277CA claim acknowledgment
    ClaimAcknowledgment,
    /// 277 claim status response
    ClaimStatusResponse,
    /// Any other transaction set
    Other(String),
}

impl TransactionSetHeader {
    pub fn kind(&self) -> TransactionKind {
        match self.transaction_set_identifier_code.as_str() {
            "277" if self.implementation_convention_reference == CLAIM_ACKNOWLEDGMENT_VERSION => {
                TransactionKind::ClaimAcknowledgment
            }
            "277" => TransactionKind::ClaimStatusResponse,
            other => TransactionKind::Other(other.to_string()),
        }
    }
}

/// Claim status tracking information (TRN)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimStatusTrackingInformation {
    /// TRN01: `1` current transaction trace, `2` referenced transaction trace
    pub trace_type_code: String,
    /// TRN02: the accumulation unique id for claim-level traces
    pub referenced_transaction_trace_number: String,
    /// TRN03
    pub originating_company_identifier: Option<String>,
    /// TRN04
    pub originating_company_supplemental_code: Option<String>,
}

impl ClaimStatusTrackingInformation {
    /// The correlation key back to the accumulation submission
    pub fn accumulation_unique_id(&self) -> &str {
        &self.referenced_transaction_trace_number
    }

    /// True for claim-level (referenced transaction) traces
    pub fn is_referenced_transaction_trace(&self) -> bool {
        self.trace_type_code == REFERENCED_TRANSACTION_TRACE
    }
}

/// Claim level status information (STC)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimLevelStatusInformation {
    /// STC01-1, e.g. `A1`, `A4`, `F0`
    pub health_care_claim_status_category_code: String,
    /// STC01-2
    pub claim_status_code: String,
    /// STC01-3
    pub entity_identifier_code: Option<String>,
    /// STC02
    pub status_information_effective_date: Option<NaiveDate>,
    /// STC03
    pub action_code: Option<String>,
    /// STC04
    pub total_claim_charge_amount: Option<String>,
}

/// One claim-level status record
///
/// Either side may be absent when the file is incomplete; see
/// [`ClaimData::is_complete`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimData {
    pub claim_status_tracking: Option<ClaimStatusTrackingInformation>,
    pub claim_level_status: Option<ClaimLevelStatusInformation>,
}

impl ClaimData {
    /// Both the trace and the status are present
    pub fn is_complete(&self) -> bool {
        self.claim_status_tracking.is_some() && self.claim_level_status.is_some()
    }

    /// Returns both halves when the record is complete
    pub fn parts(&self) -> Option<(&ClaimStatusTrackingInformation, &ClaimLevelStatusInformation)> {
        match (&self.claim_status_tracking, &self.claim_level_status) {
            (Some(tracking), Some(status)) => Some((tracking, status)),
            _ => None,
        }
    }
}

/// A parsed 277/277CA file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct X12Data277 {
    pub interchange_control_header: Option<InterchangeControlHeader>,
    pub functional_group_header: Option<FunctionalGroupHeader>,
    pub transaction_set_header: Option<TransactionSetHeader>,
    pub claims: Vec<ClaimData>,
}

impl X12Data277 {
    /// True when the document carries no claim records
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Claim records with both a trace and a status
    pub fn complete_claims(&self) -> impl Iterator<Item = &ClaimData> {
        self.claims.iter().filter(|c| c.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interchange_datetime() {
        let header = InterchangeControlHeader {
            interchange_date: "241021".to_string(),
            interchange_time: "1305".to_string(),
            usage_indicator: "P".to_string(),
            ..Default::default()
        };

        let datetime = header.interchange_datetime().unwrap();
        assert_eq!(datetime.to_string(), "2024-10-21 13:05:00");
        assert!(header.is_production());
    }

    #[test]
    fn test_interchange_datetime_malformed() {
        let header = InterchangeControlHeader {
            interchange_date: "2410".to_string(),
            interchange_time: "1305".to_string(),
            ..Default::default()
        };
        assert!(header.interchange_datetime().is_none());
    }

    #[test]
    fn test_transaction_kind() {
        let mut header = TransactionSetHeader {
            transaction_set_identifier_code: "277".to_string(),
            transaction_set_control_number: "0001".to_string(),
            implementation_convention_reference: "005010X214".to_string(),
        };
        assert_eq!(header.kind(), TransactionKind::ClaimAcknowledgment);

        header.implementation_convention_reference = "005010X212".to_string();
        assert_eq!(header.kind(), TransactionKind::ClaimStatusResponse);

        header.transaction_set_identifier_code = "835".to_string();
        assert_eq!(header.kind(), TransactionKind::Other("835".to_string()));
    }

    #[test]
    fn test_claim_data_completeness() {
        let mut claim = ClaimData::default();
        assert!(!claim.is_complete());
        assert!(claim.parts().is_none());

        claim.claim_status_tracking = Some(ClaimStatusTrackingInformation {
            trace_type_code: "2".to_string(),
            referenced_transaction_trace_number: "ABC".to_string(),
            ..Default::default()
        });
        assert!(!claim.is_complete());

        claim.claim_level_status = Some(ClaimLevelStatusInformation::default());
        assert!(claim.is_complete());
        assert_eq!(claim.parts().unwrap().0.accumulation_unique_id(), "ABC");
    }
}
