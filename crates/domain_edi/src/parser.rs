//! 277/277CA parser
//!
//! The parser is a single fold over the tokenized segments. `ParserState`
//! carries everything that survives from one segment to the next: the
//! envelope headers (first occurrence wins), the pending trace, and the
//! claims collected so far.
//!
//! # Claim pairing
//!
//! HL nesting depth is not tracked, but every HL opens a new block and
//! clears the pending trace. Each STC is paired with the TRN seen earlier in
//! its block and appended to `claims` immediately; an STC in a block with no
//! TRN gets no tracking. A referenced-transaction trace (TRN01 = `2`) that
//! never receives a status is emitted on its own once the next TRN, HL or
//! transaction set, or the end of input, is reached.
//! Current-transaction traces (TRN01 = `1`) carry no claim and are dropped
//! when they go unpaired.
//!
//! ```text
//! HL*1  TRN*1 (source)    -> pending, no claim
//! HL*2  TRN*2 (receiver)  -> pending
//!       STC*A1            -> claim(TRN*2, A1)
//! HL*4  TRN*2 (patient)   -> pending
//!       STC*A4            -> claim(TRN*2, A4)
//! HL*5  STC*A7            -> claim(None, A7)
//! ```

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::model::{
    ClaimData, ClaimLevelStatusInformation, ClaimStatusTrackingInformation,
    FunctionalGroupHeader, InterchangeControlHeader, TransactionSetHeader, X12Data277,
};
use crate::segment::SegmentKind;
use crate::tokenizer::{tokenize, Delimiters, RawSegment};

/// Number of data elements in an ISA segment
pub const ISA_ELEMENT_COUNT: usize = 16;

/// Accumulator threaded through the segment fold
#[derive(Debug, Default)]
pub struct ParserState {
    interchange: Option<InterchangeControlHeader>,
    functional_group: Option<FunctionalGroupHeader>,
    transaction: Option<TransactionSetHeader>,
    pending_trn: Option<ClaimStatusTrackingInformation>,
    pending_trn_paired: bool,
    claims: Vec<ClaimData>,
}

impl ParserState {
    /// Applies one segment
    pub fn step(mut self, segment: RawSegment<'_>) -> Self {
        match SegmentKind::from_id(segment.id) {
            SegmentKind::Isa => self.on_isa(&segment),
            SegmentKind::Gs => {
                if self.functional_group.is_none() {
                    self.functional_group = Some(functional_group_header(&segment));
                }
            }
            SegmentKind::St => self.on_st(&segment),
            SegmentKind::Hl => self.on_hl(),
            SegmentKind::Trn => self.on_trn(&segment),
            SegmentKind::Stc => self.on_stc(&segment),
            SegmentKind::Se => self.flush_pending(),
            SegmentKind::Other => {}
        }
        self
    }

    /// Finishes the fold and builds the document
    pub fn finish(mut self) -> X12Data277 {
        self.flush_pending();
        X12Data277 {
            interchange_control_header: self.interchange,
            functional_group_header: self.functional_group,
            transaction_set_header: self.transaction,
            claims: self.claims,
        }
    }

    fn on_isa(&mut self, segment: &RawSegment<'_>) {
        if self.interchange.is_some() {
            warn!("Additional ISA segment ignored");
            return;
        }
        if segment.element_count() != ISA_ELEMENT_COUNT {
            warn!(
                expected = ISA_ELEMENT_COUNT,
                actual = segment.element_count(),
                "Malformed ISA segment, missing elements default to empty"
            );
        }
        self.interchange = Some(interchange_control_header(segment));
    }

    fn on_st(&mut self, segment: &RawSegment<'_>) {
        self.flush_pending();
        self.pending_trn = None;
        if self.transaction.is_none() {
            self.transaction = Some(transaction_set_header(segment));
        }
    }

    fn on_hl(&mut self) {
        self.flush_pending();
        self.pending_trn = None;
    }

    fn on_trn(&mut self, segment: &RawSegment<'_>) {
        self.flush_pending();
        self.pending_trn = claim_status_tracking(segment);
        self.pending_trn_paired = false;
    }

    fn on_stc(&mut self, segment: &RawSegment<'_>) {
        let status = claim_level_status(segment);
        if self.pending_trn.is_none() {
            debug!("STC segment without a preceding TRN");
        }
        self.claims.push(ClaimData {
            claim_status_tracking: self.pending_trn.clone(),
            claim_level_status: status,
        });
        self.pending_trn_paired = true;
    }

    /// Emits an unpaired claim-level trace as an incomplete record
    fn flush_pending(&mut self) {
        if self.pending_trn_paired {
            return;
        }
        if let Some(trace) = self.pending_trn.take() {
            if trace.is_referenced_transaction_trace() {
                debug!(
                    trace_number = %trace.referenced_transaction_trace_number,
                    "TRN segment without a claim status"
                );
                self.claims.push(ClaimData {
                    claim_status_tracking: Some(trace),
                    claim_level_status: None,
                });
            }
        }
    }
}

/// Parses a 277/277CA file, detecting delimiters from its ISA segment
pub fn parse_277(text: &str) -> X12Data277 {
    parse_277_with(text, Delimiters::detect(text))
}

/// Parses a 277/277CA file with explicit delimiters
///
/// Never fails: empty input yields an empty document and malformed segments
/// are logged and defaulted.
pub fn parse_277_with(text: &str, delimiters: Delimiters) -> X12Data277 {
    let document = tokenize(text, delimiters)
        .fold(ParserState::default(), ParserState::step)
        .finish();

    debug!(claims = document.claims.len(), "Parsed 277 document");
    document
}

fn owned(segment: &RawSegment<'_>, element_number: usize) -> String {
    segment.value(element_number).trim().to_string()
}

fn optional(segment: &RawSegment<'_>, element_number: usize) -> Option<String> {
    segment.non_empty(element_number).map(str::to_string)
}

fn interchange_control_header(segment: &RawSegment<'_>) -> InterchangeControlHeader {
    InterchangeControlHeader {
        authorization_information_qualifier: owned(segment, 1),
        authorization_information: owned(segment, 2),
        security_information_qualifier: owned(segment, 3),
        security_information: owned(segment, 4),
        interchange_sender_id_qualifier: owned(segment, 5),
        interchange_sender_id: owned(segment, 6),
        interchange_receiver_id_qualifier: owned(segment, 7),
        interchange_receiver_id: owned(segment, 8),
        interchange_date: owned(segment, 9),
        interchange_time: owned(segment, 10),
        repetition_separator: owned(segment, 11),
        interchange_control_version_number: owned(segment, 12),
        interchange_control_number: owned(segment, 13),
        acknowledgment_requested: owned(segment, 14),
        usage_indicator: owned(segment, 15),
        component_element_separator: owned(segment, 16),
    }
}

fn functional_group_header(segment: &RawSegment<'_>) -> FunctionalGroupHeader {
    FunctionalGroupHeader {
        functional_identifier_code: owned(segment, 1),
        application_sender_code: owned(segment, 2),
        application_receiver_code: owned(segment, 3),
        date: owned(segment, 4),
        time: owned(segment, 5),
        group_control_number: owned(segment, 6),
        responsible_agency_code: owned(segment, 7),
        version_identifier_code: owned(segment, 8),
    }
}

fn transaction_set_header(segment: &RawSegment<'_>) -> TransactionSetHeader {
    TransactionSetHeader {
        transaction_set_identifier_code: owned(segment, 1),
        transaction_set_control_number: owned(segment, 2),
        implementation_convention_reference: owned(segment, 3),
    }
}

fn claim_status_tracking(segment: &RawSegment<'_>) -> Option<ClaimStatusTrackingInformation> {
    let Some(trace_number) = segment.non_empty(2) else {
        warn!(elements = segment.element_count(), "TRN segment without a trace number");
        return None;
    };

    Some(ClaimStatusTrackingInformation {
        trace_type_code: owned(segment, 1),
        referenced_transaction_trace_number: trace_number.to_string(),
        originating_company_identifier: optional(segment, 3),
        originating_company_supplemental_code: optional(segment, 4),
    })
}

fn claim_level_status(segment: &RawSegment<'_>) -> Option<ClaimLevelStatusInformation> {
    let composite = segment.element(1).filter(|e| !e.as_str().trim().is_empty());
    let Some(composite) = composite else {
        warn!(elements = segment.element_count(), "STC segment without a status composite");
        return None;
    };

    let component = |index: usize| {
        composite
            .component(index)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let effective_date = segment.non_empty(2).and_then(|raw| {
        NaiveDate::parse_from_str(raw, "%Y%m%d")
            .map_err(|e| warn!(value = raw, error = %e, "Unparseable STC02 effective date"))
            .ok()
    });

    Some(ClaimLevelStatusInformation {
        health_care_claim_status_category_code: component(0).unwrap_or_default(),
        claim_status_code: component(1).unwrap_or_default(),
        entity_identifier_code: component(2),
        status_information_effective_date: effective_date,
        action_code: optional(segment, 3),
        total_claim_charge_amount: optional(segment, 4),
    })
}
