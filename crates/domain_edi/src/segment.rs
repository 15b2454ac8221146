//! Segment kinds recognized by the 277 parser

use serde::{Deserialize, Serialize};

/// Segment tags the parser acts on; everything else is `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Interchange control header
    Isa,
    /// Functional group header
    Gs,
    /// Transaction set header
    St,
    /// Hierarchical level, opens a new information block
    Hl,
    /// Trace (claim status tracking)
    Trn,
    /// Claim level status information
    Stc,
    /// Transaction set trailer
    Se,
    /// Any other tag (BHT, NM1, DTP, QTY, AMT, REF, GE, IEA, ...)
    Other,
}

const SEGMENT_KINDS: &[(&str, SegmentKind)] = &[
    ("ISA", SegmentKind::Isa),
    ("GS", SegmentKind::Gs),
    ("ST", SegmentKind::St),
    ("HL", SegmentKind::Hl),
    ("TRN", SegmentKind::Trn),
    ("STC", SegmentKind::Stc),
    ("SE", SegmentKind::Se),
];

impl SegmentKind {
    /// Resolves a segment id
    pub fn from_id(id: &str) -> Self {
        SEGMENT_KINDS
            .iter()
            .find(|(tag, _)| *tag == id)
            .map(|(_, kind)| *kind)
            .unwrap_or(SegmentKind::Other)
    }
}
