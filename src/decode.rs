//! Turning raw CSV records into text records.
//!
//! Each raw record is classified as either a valid [StringRecord] or a
//! [SkipReason]. Undecodable bytes are handled according to [Decoding].

use clap::ValueEnum;
use csv::{ByteRecord, StringRecord};
use std::borrow::Cow;
use std::fmt;

/// What to do with bytes that are not valid UTF-8.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Decoding {
    /// Skip the whole record.
    Strict,
    /// Replace each invalid sequence with U+FFFD.
    #[default]
    Replace,
    /// Remove invalid bytes.
    Drop,
}

/// Why a single record was left out of the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    OversizedField,
    EmbeddedNul,
    InvalidUtf8,
    UnterminatedQuote,
    Malformed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::OversizedField => write!(f, "oversized field"),
            SkipReason::EmbeddedNul => write!(f, "embedded NUL byte"),
            SkipReason::InvalidUtf8 => write!(f, "invalid UTF-8"),
            SkipReason::UnterminatedQuote => write!(f, "unterminated quoted field"),
            SkipReason::Malformed => write!(f, "malformed record"),
        }
    }
}

/// Result of reading one data record.
#[derive(Debug, PartialEq)]
pub enum RecordOutcome {
    /// `repaired` is set if decoding altered any bytes.
    Valid {
        record: StringRecord,
        repaired: bool,
    },
    Skipped(SkipReason),
}

fn decode_field(bytes: &[u8], decoding: Decoding) -> Option<Cow<'_, str>> {
    match decoding {
        Decoding::Strict => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
        Decoding::Replace => Some(String::from_utf8_lossy(bytes)),
        Decoding::Drop => match std::str::from_utf8(bytes) {
            Ok(s) => Some(Cow::Borrowed(s)),
            Err(_) => Some(Cow::Owned(
                bytes.utf8_chunks().map(|chunk| chunk.valid()).collect(),
            )),
        },
    }
}

/// Classify a raw record.
///
/// Guards are checked in order: embedded NUL, oversized field, decoding.
pub fn classify(raw: &ByteRecord, decoding: Decoding, max_field_len: usize) -> RecordOutcome {
    if raw.iter().any(|field| field.contains(&0)) {
        return RecordOutcome::Skipped(SkipReason::EmbeddedNul);
    }
    if raw.iter().any(|field| field.len() > max_field_len) {
        return RecordOutcome::Skipped(SkipReason::OversizedField);
    }
    let mut record = StringRecord::with_capacity(raw.as_slice().len(), raw.len());
    let mut repaired = false;
    for field in raw {
        match decode_field(field, decoding) {
            None => return RecordOutcome::Skipped(SkipReason::InvalidUtf8),
            Some(text) => {
                repaired |= matches!(text, Cow::Owned(_));
                record.push_field(&text);
            }
        }
    }
    RecordOutcome::Valid { record, repaired }
}
