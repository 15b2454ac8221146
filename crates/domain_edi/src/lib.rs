//! X12 EDI Domain
//!
//! This crate turns raw X12 277/277CA claim status files into a structured
//! document the accumulation domain can act on.
//!
//! # Pipeline
//!
//! ```text
//! raw text -> tokenizer (segments/elements) -> parser (fold) -> X12Data277
//! ```
//!
//! Parsing is best-effort: malformed segments are logged and defaulted, and
//! the parser never fails on content. Only delimiter configuration can be
//! rejected.

pub mod error;
pub mod tokenizer;
pub mod segment;
pub mod model;
pub mod parser;

pub use error::EdiError;
pub use tokenizer::{tokenize, Delimiters, RawElement, RawSegment, Segments};
pub use segment::SegmentKind;
pub use model::{
    ClaimData, ClaimLevelStatusInformation, ClaimStatusTrackingInformation,
    FunctionalGroupHeader, InterchangeControlHeader, TransactionKind, TransactionSetHeader,
    X12Data277,
};
pub use parser::{parse_277, parse_277_with};
