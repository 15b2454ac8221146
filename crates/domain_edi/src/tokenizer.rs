//! Segment tokenizer
//!
//! Splits X12 text into segments and elements. Files delivered over SFTP are
//! frequently pretty-printed (one segment per line, indented, CRLF endings),
//! so every segment is trimmed before it is split into elements.
//!
//! Element numbering follows X12 conventions: `element(0)` is the segment id,
//! `element(1)` is the first data element (e.g. `TRN01`).

use std::str::Split;

use crate::error::EdiError;

/// X12 delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Segment terminator (typically '~')
    pub segment: char,
    /// Element separator (typically '*')
    pub element: char,
    /// Sub-element (component) separator (typically ':')
    pub sub_element: char,
    /// Repetition separator (typically '^')
    pub repetition: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            segment: '~',
            element: '*',
            sub_element: ':',
            repetition: '^',
        }
    }
}

impl Delimiters {
    /// Creates a delimiter set
    ///
    /// Delimiters must be distinct and non-alphanumeric. Only the segment
    /// terminator may be whitespace (some payers terminate with a newline).
    pub fn new(segment: char, element: char, sub_element: char, repetition: char) -> Result<Self, EdiError> {
        let all = [segment, element, sub_element, repetition];
        for (i, c) in all.iter().enumerate() {
            if c.is_alphanumeric() || (i > 0 && c.is_whitespace()) {
                return Err(EdiError::InvalidDelimiters(format!(
                    "delimiter {:?} must not be alphanumeric or whitespace",
                    c
                )));
            }
            if all[i + 1..].contains(c) {
                return Err(EdiError::InvalidDelimiters(format!(
                    "delimiter {:?} is used more than once",
                    c
                )));
            }
        }
        Ok(Self {
            segment,
            element,
            sub_element,
            repetition,
        })
    }

    /// Reads the delimiters declared by a leading ISA segment
    ///
    /// The element separator is the character after `ISA`, the repetition
    /// separator is ISA11, the sub-element separator is ISA16 and the segment
    /// terminator is the character that follows it. Returns `None` when the
    /// text does not start with a complete ISA segment or the declared set is
    /// invalid.
    pub fn from_isa(text: &str) -> Option<Self> {
        let isa = text.trim_start().strip_prefix("ISA")?;
        let element = isa.chars().next()?;
        let fields: Vec<&str> = isa[element.len_utf8()..].splitn(16, element).collect();
        if fields.len() < 16 {
            return None;
        }

        let mut tail = fields[15].chars();
        let sub_element = tail.next()?;
        let segment = tail.next()?;
        let repetition = fields[10]
            .chars()
            .next()
            .filter(|c| !c.is_alphanumeric())
            .unwrap_or(Self::default().repetition);

        Self::new(segment, element, sub_element, repetition).ok()
    }

    /// Reads the delimiters from the ISA segment, falling back to the defaults
    pub fn detect(text: &str) -> Self {
        Self::from_isa(text).unwrap_or_default()
    }
}

/// One element of a segment, possibly composite or repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawElement<'a> {
    value: &'a str,
    sub_element: char,
    repetition: char,
}

impl<'a> RawElement<'a> {
    /// Returns the raw element text
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.value
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Splits the element on the sub-element separator
    pub fn components(&self) -> impl Iterator<Item = &'a str> {
        self.value.split(self.sub_element)
    }

    /// Returns the component at a 0-based position
    pub fn component(&self, index: usize) -> Option<&'a str> {
        self.components().nth(index)
    }

    /// Splits the element on the repetition separator
    pub fn repetitions(&self) -> impl Iterator<Item = RawElement<'a>> {
        let sub_element = self.sub_element;
        let repetition = self.repetition;
        self.value.split(repetition).map(move |value| RawElement {
            value,
            sub_element,
            repetition,
        })
    }
}

/// One tokenized segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment<'a> {
    /// Segment identifier (e.g. "ISA", "TRN", "STC")
    pub id: &'a str,
    /// Data elements, not including the segment id
    pub elements: Vec<RawElement<'a>>,
    /// Delimiters the segment was split with
    pub delimiters: Delimiters,
}

impl<'a> RawSegment<'a> {
    fn parse(text: &'a str, delimiters: &Delimiters) -> Self {
        let mut parts = text.split(delimiters.element);
        let id = parts.next().unwrap_or_default().trim();
        let elements = parts
            .map(|value| RawElement {
                value,
                sub_element: delimiters.sub_element,
                repetition: delimiters.repetition,
            })
            .collect();
        Self {
            id,
            elements,
            delimiters: *delimiters,
        }
    }

    /// Get element by X12 element number (0 is the segment id)
    pub fn element(&self, element_number: usize) -> Option<RawElement<'a>> {
        match element_number {
            0 => Some(RawElement {
                value: self.id,
                sub_element: self.delimiters.sub_element,
                repetition: self.delimiters.repetition,
            }),
            n => self.elements.get(n - 1).copied(),
        }
    }

    /// Element text by X12 element number, empty when absent
    pub fn value(&self, element_number: usize) -> &'a str {
        self.element(element_number).map(|e| e.as_str()).unwrap_or_default()
    }

    /// Element text by X12 element number, `None` when absent or empty
    pub fn non_empty(&self, element_number: usize) -> Option<&'a str> {
        self.element(element_number)
            .map(|e| e.as_str().trim())
            .filter(|v| !v.is_empty())
    }

    /// Number of data elements, not including the segment id
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

/// Lazy, single-pass iterator over the segments of a text
#[derive(Debug)]
pub struct Segments<'a> {
    inner: Split<'a, char>,
    delimiters: Delimiters,
}

impl<'a> Iterator for Segments<'a> {
    type Item = RawSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let piece = self.inner.next()?.trim();
            if !piece.is_empty() {
                return Some(RawSegment::parse(piece, &self.delimiters));
            }
        }
    }
}

/// Tokenizes X12 text into segments
///
/// Empty or whitespace-only text yields no segments.
pub fn tokenize(text: &str, delimiters: Delimiters) -> Segments<'_> {
    Segments {
        inner: text.split(delimiters.segment),
        delimiters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_segments() {
        assert_eq!(tokenize("", Delimiters::default()).count(), 0);
        assert_eq!(tokenize("  \r\n \n", Delimiters::default()).count(), 0);
    }

    #[test]
    fn test_trims_pretty_printed_lines() {
        let text = "    ST*277*0001*005010X214~\r\n    BHT*0085*08*ABC~\n";
        let segments: Vec<_> = tokenize(text, Delimiters::default()).collect();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].id, "ST");
        assert_eq!(segments[0].value(3), "005010X214");
        assert_eq!(segments[1].id, "BHT");
        assert_eq!(segments[1].value(3), "ABC");
    }

    #[test]
    fn test_element_numbering() {
        let segment = tokenize("TRN*2*2RFAUCEKQY2ZFA4X9KEX~", Delimiters::default())
            .next()
            .unwrap();

        assert_eq!(segment.value(0), "TRN");
        assert_eq!(segment.value(1), "2");
        assert_eq!(segment.value(2), "2RFAUCEKQY2ZFA4X9KEX");
        assert_eq!(segment.value(3), "");
        assert_eq!(segment.non_empty(3), None);
        assert_eq!(segment.element_count(), 2);
    }

    #[test]
    fn test_components_and_repetitions() {
        let segment = tokenize("STC*A1:19:PR*20241021*WQ*0~", Delimiters::default())
            .next()
            .unwrap();
        let composite = segment.element(1).unwrap();

        assert_eq!(composite.components().collect::<Vec<_>>(), vec!["A1", "19", "PR"]);
        assert_eq!(composite.component(1), Some("19"));
        assert_eq!(composite.component(3), None);

        let repeated = tokenize("REF*EJ*A^B^C~", Delimiters::default()).next().unwrap();
        let values: Vec<_> = repeated
            .element(2)
            .unwrap()
            .repetitions()
            .map(|e| e.as_str())
            .collect();
        assert_eq!(values, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_custom_delimiters() {
        let delimiters = Delimiters::new('\'', '+', '>', '!').unwrap();
        let segments: Vec<_> = tokenize("TRN+2+ABC'STC+A4>35'", delimiters).collect();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].element(1).unwrap().component(0), Some("A4"));
    }

    #[test]
    fn test_rejects_duplicate_delimiters() {
        assert!(Delimiters::new('~', '*', '*', '^').is_err());
        assert!(Delimiters::new('~', 'A', ':', '^').is_err());
        assert!(Delimiters::new('~', '\n', ':', '^').is_err());
        assert!(Delimiters::new('\n', '*', ':', '^').is_ok());
    }

    #[test]
    fn test_detect_from_isa() {
        let isa = "ISA|00|          |00|          |ZZ|SENDER         |ZZ|RECEIVER       |241021|1200|!|00501|000000001|0|P|>\n";
        let detected = Delimiters::from_isa(isa).unwrap();

        assert_eq!(detected.element, '|');
        assert_eq!(detected.repetition, '!');
        assert_eq!(detected.sub_element, '>');
        assert_eq!(detected.segment, '\n');
    }
}
