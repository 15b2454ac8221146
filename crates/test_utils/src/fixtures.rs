//! Pre-built 277CA Fixtures
//!
//! Fixture files shared by the parser, processor, and ingestion tests, plus a
//! small builder for synthesizing 277CA documents inline.

/// A pretty-printed 277CA with one claim acknowledged at two levels
///
/// Both STC segments pair with trace `2RFAUCEKQY2ZFA4X9KEX`: `A1:19` then
/// `A4:35:PR`.
pub const SAMPLE_277CA: &str = include_str!("../../domain_edi/tests/fixtures/277ca_sample.edi");

/// A single-line 277CA with accepted, rejected, and status-less claims
pub const MIXED_277CA: &str =
    include_str!("../../domain_edi/tests/fixtures/277ca_rejected_and_accepted.edi");

/// Trace number carried by both claims of [`SAMPLE_277CA`]
pub const SAMPLE_TRACE_NUMBER: &str = "2RFAUCEKQY2ZFA4X9KEX";

/// Trace numbers of [`MIXED_277CA`] in file order
pub const MIXED_TRACE_NUMBERS: [&str; 4] = [
    "BATCH0001",
    "ACCUM000000000001",
    "ACCUM000000000002",
    "ACCUM000000000003",
];

/// One TRN/STC pair for [`Edi277Builder`]
#[derive(Debug, Clone)]
struct ClaimEntry {
    trace_number: String,
    status: Option<String>,
}

/// Builds a minimal 277CA transaction using default delimiters
///
/// ```rust
/// use test_utils::Edi277Builder;
///
/// let text = Edi277Builder::new()
///     .claim("ABC123", "A4:35")
///     .claim_without_status("DEF456")
///     .build();
/// assert!(text.contains("TRN*2*ABC123~STC*A4:35*20241021*U*0~"));
/// ```
#[derive(Debug, Clone)]
pub struct Edi277Builder {
    sender: String,
    receiver: String,
    date: String,
    control_number: u32,
    claims: Vec<ClaimEntry>,
}

impl Default for Edi277Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Edi277Builder {
    pub fn new() -> Self {
        Self {
            sender: "AETNA60054".to_string(),
            receiver: "MAVENCLINIC".to_string(),
            date: "20241021".to_string(),
            control_number: 1,
            claims: Vec::new(),
        }
    }

    /// Sets the interchange date as `YYYYMMDD`
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_control_number(mut self, control_number: u32) -> Self {
        self.control_number = control_number;
        self
    }

    /// Adds a claim-level trace with an STC01 composite such as `A4:35`
    pub fn claim(mut self, trace_number: impl Into<String>, stc01: impl Into<String>) -> Self {
        self.claims.push(ClaimEntry {
            trace_number: trace_number.into(),
            status: Some(stc01.into()),
        });
        self
    }

    /// Adds a claim-level trace with no STC
    pub fn claim_without_status(mut self, trace_number: impl Into<String>) -> Self {
        self.claims.push(ClaimEntry {
            trace_number: trace_number.into(),
            status: None,
        });
        self
    }

    pub fn build(&self) -> String {
        let short_date = self.date.get(2..).unwrap_or_default();
        let mut segments = vec![
            format!(
                "ISA*00*          *00*          *ZZ*{:<15}*ZZ*{:<15}*{}*1200*^*00501*{:09}*0*P*:",
                self.sender, self.receiver, short_date, self.control_number
            ),
            format!(
                "GS*HN*{}*{}*{}*1200*{}*X*005010X214",
                self.sender, self.receiver, self.date, self.control_number
            ),
            format!("ST*277*{:04}*005010X214", self.control_number),
            format!("BHT*0085*08*{}*{}*1200*TH", self.control_number, self.date),
        ];

        for entry in &self.claims {
            segments.push(format!("TRN*2*{}", entry.trace_number));
            if let Some(status) = &entry.status {
                segments.push(format!("STC*{}*{}*U*0", status, self.date));
            }
        }

        // ST through SE inclusive
        let transaction_segments = segments.len() - 2 + 1;
        segments.push(format!("SE*{}*{:04}", transaction_segments, self.control_number));
        segments.push(format!("GE*1*{}", self.control_number));
        segments.push(format!("IEA*1*{:09}", self.control_number));

        let mut text = segments.join("~");
        text.push('~');
        text
    }
}
