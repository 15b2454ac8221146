//! Parser tests against 277CA fixture files

use domain_edi::{
    parse_277, parse_277_with, tokenize, Delimiters, TransactionKind, X12Data277,
};
const SAMPLE_277CA: &str = include_str!("fixtures/277ca_sample.edi");
const MIXED_277CA: &str = include_str!("fixtures/277ca_rejected_and_accepted.edi");
const PATIENT_WITHOUT_TRACE_277CA: &str = include_str!("fixtures/277ca_patient_without_trace.edi");

const TRACE_NUMBER: &str = "2RFAUCEKQY2ZFA4X9KEX";

mod sample_file {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenizes_every_segment() {
        let ids: Vec<&str> = tokenize(SAMPLE_277CA, Delimiters::default())
            .map(|s| s.id)
            .collect();

        assert_eq!(ids.len(), 28);
        assert_eq!(ids.first(), Some(&"ISA"));
        assert_eq!(ids.last(), Some(&"IEA"));
        assert!(ids.iter().all(|id| !id.starts_with(char::is_whitespace)));
    }

    #[test]
    fn test_interchange_header() {
        let document = parse_277(SAMPLE_277CA);
        let header = document.interchange_control_header.expect("ISA header");

        assert_eq!(header.authorization_information_qualifier, "00");
        assert_eq!(header.authorization_information, "");
        assert_eq!(header.interchange_sender_id_qualifier, "ZZ");
        assert_eq!(header.interchange_sender_id, "AETNA60054");
        assert_eq!(header.interchange_receiver_id, "MAVENCLINIC");
        assert_eq!(header.interchange_date, "241021");
        assert_eq!(header.interchange_time, "1305");
        assert_eq!(header.repetition_separator, "^");
        assert_eq!(header.interchange_control_version_number, "00501");
        assert_eq!(header.interchange_control_number, "000000101");
        assert_eq!(header.acknowledgment_requested, "0");
        assert_eq!(header.usage_indicator, "P");
        assert_eq!(header.component_element_separator, ":");
        assert!(header.is_production());
    }

    #[test]
    fn test_group_and_transaction_headers() {
        let document = parse_277(SAMPLE_277CA);

        let group = document.functional_group_header.expect("GS header");
        assert_eq!(group.functional_identifier_code, "HN");
        assert_eq!(group.group_control_number, "101");
        assert_eq!(group.version_identifier_code, "005010X214");

        let transaction = document.transaction_set_header.expect("ST header");
        assert_eq!(transaction.transaction_set_identifier_code, "277");
        assert_eq!(transaction.transaction_set_control_number, "0001");
        assert_eq!(transaction.implementation_convention_reference, "005010X214");
        assert_eq!(transaction.kind(), TransactionKind::ClaimAcknowledgment);
    }

    #[test]
    fn test_two_claims_share_trace_number() {
        let document = parse_277(SAMPLE_277CA);

        assert_eq!(document.claims.len(), 2);

        let categories: Vec<&str> = document
            .claims
            .iter()
            .map(|claim| {
                let (tracking, status) = claim.parts().expect("complete claim");
                assert_eq!(tracking.referenced_transaction_trace_number, TRACE_NUMBER);
                status.health_care_claim_status_category_code.as_str()
            })
            .collect();

        assert_eq!(categories, vec!["A1", "A4"]);
    }

    #[test]
    fn test_claim_detail_codes() {
        let document = parse_277(SAMPLE_277CA);
        let (_, first) = document.claims[0].parts().unwrap();
        let (_, second) = document.claims[1].parts().unwrap();

        assert_eq!(first.claim_status_code, "19");
        assert_eq!(first.action_code.as_deref(), Some("WQ"));
        assert_eq!(second.claim_status_code, "35");
        assert_eq!(second.entity_identifier_code.as_deref(), Some("PR"));
        assert_eq!(second.total_claim_charge_amount.as_deref(), Some("150.25"));
    }

    #[test]
    fn test_reparse_is_idempotent() {
        assert_eq!(parse_277(SAMPLE_277CA), parse_277(SAMPLE_277CA));
    }

    #[test]
    fn test_single_line_and_crlf_forms_match() {
        let single_line: String = SAMPLE_277CA.lines().map(str::trim).collect();
        let crlf = SAMPLE_277CA.replace('\n', "\r\n");

        let expected = parse_277(SAMPLE_277CA);
        assert_eq!(parse_277(&single_line), expected);
        assert_eq!(parse_277(&crlf), expected);
    }

    #[test]
    fn test_document_serializes() {
        let document = parse_277(SAMPLE_277CA);
        let json = serde_json::to_string(&document).unwrap();
        let restored: X12Data277 = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, document);
    }
}

mod mixed_file {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_incomplete_trailing_claim() {
        let document = parse_277(MIXED_277CA);

        assert_eq!(document.claims.len(), 4);
        assert_eq!(document.complete_claims().count(), 3);

        let last = document.claims.last().unwrap();
        assert!(last.claim_level_status.is_none());
        assert_eq!(
            last.claim_status_tracking.as_ref().unwrap().accumulation_unique_id(),
            "ACCUM000000000003"
        );
    }

    #[test]
    fn test_claim_order_follows_file() {
        let document = parse_277(MIXED_277CA);
        let ids: Vec<&str> = document
            .claims
            .iter()
            .filter_map(|c| c.claim_status_tracking.as_ref())
            .map(|t| t.accumulation_unique_id())
            .collect();

        assert_eq!(
            ids,
            vec!["BATCH0001", "ACCUM000000000001", "ACCUM000000000002", "ACCUM000000000003"]
        );
    }
}

mod edge_cases {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_patient_loop_without_trace_is_not_paired_with_previous_loop() {
        let document = parse_277(PATIENT_WITHOUT_TRACE_277CA);
        let pairs: Vec<(Option<&str>, Option<&str>)> = document
            .claims
            .iter()
            .map(|c| {
                (
                    c.claim_status_tracking.as_ref().map(|t| t.accumulation_unique_id()),
                    c.claim_level_status
                        .as_ref()
                        .map(|s| s.health_care_claim_status_category_code.as_str()),
                )
            })
            .collect();

        assert_eq!(
            pairs,
            vec![
                (Some("BATCH0003"), Some("A1")),
                (Some("ACCUM000000000004"), Some("A2")),
                (None, Some("A7")),
            ]
        );
    }

    #[test]
    fn test_empty_input_short_circuits() {
        assert_eq!(tokenize("", Delimiters::default()).count(), 0);

        let document = parse_277("");
        assert!(document.claims.is_empty());
        assert!(document.interchange_control_header.is_none());
        assert!(document.transaction_set_header.is_none());
    }

    #[test]
    fn test_missing_headers_are_none() {
        let document = parse_277("TRN*2*ABC~STC*A2:20~");

        assert!(document.interchange_control_header.is_none());
        assert!(document.transaction_set_header.is_none());
        assert_eq!(document.claims.len(), 1);
    }

    #[test]
    fn test_unrecognized_segments_ignored() {
        let document = parse_277("ZZZ*1*2~TRN*2*ABC~XYZ~STC*A2:20~FOO*BAR~");
        assert_eq!(document.claims.len(), 1);
        assert!(document.claims[0].is_complete());
    }

    #[test]
    fn test_custom_delimiters_detected_from_isa() {
        let custom = SAMPLE_277CA
            .replace('*', "|")
            .replace('~', "'")
            .replace(":", ">")
            .replace("|^|", "|!|");

        let document = parse_277(&custom);
        assert_eq!(document.claims.len(), 2);
        assert_eq!(
            document.interchange_control_header.unwrap().component_element_separator,
            ">"
        );
    }

    #[test]
    fn test_explicit_delimiters_override_detection() {
        let document = parse_277_with("TRN|2|ABC'STC|A4>35'", Delimiters::new('\'', '|', '>', '!').unwrap());
        let (_, status) = document.claims[0].parts().unwrap();
        assert_eq!(status.health_care_claim_status_category_code, "A4");
        assert_eq!(status.claim_status_code, "35");
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_parse_is_total_and_deterministic(text in "(ISA|TRN|STC|ST|SE|HL)?[A-Z0-9*:~^ \n]{0,200}") {
            prop_assert_eq!(parse_277(&text), parse_277(&text));
        }

        #[test]
        fn prop_every_stc_yields_a_claim(count in 0usize..20) {
            let text: String = (0..count).map(|i| format!("TRN*2*ID{}~STC*A2:20~", i)).collect();
            let document = parse_277(&text);
            prop_assert_eq!(document.claims.len(), count);
            prop_assert!(document.claims.iter().all(|c| c.is_complete()));
        }
    }
}
