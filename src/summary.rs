//! Counters collected during one pass over the input.

use crate::decode::SkipReason;
use crate::errors::{self, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::{fmt, fs, io};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SkipCounts {
    pub oversized_field: u64,
    pub embedded_nul: u64,
    pub invalid_utf8: u64,
    pub unterminated_quote: u64,
    pub malformed: u64,
}

impl SkipCounts {
    pub fn add(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::OversizedField => self.oversized_field += 1,
            SkipReason::EmbeddedNul => self.embedded_nul += 1,
            SkipReason::InvalidUtf8 => self.invalid_utf8 += 1,
            SkipReason::UnterminatedQuote => self.unterminated_quote += 1,
            SkipReason::Malformed => self.malformed += 1,
        }
    }

    pub fn get(&self, reason: SkipReason) -> u64 {
        match reason {
            SkipReason::OversizedField => self.oversized_field,
            SkipReason::EmbeddedNul => self.embedded_nul,
            SkipReason::InvalidUtf8 => self.invalid_utf8,
            SkipReason::UnterminatedQuote => self.unterminated_quote,
            SkipReason::Malformed => self.malformed,
        }
    }

    pub fn total(&self) -> u64 {
        self.oversized_field
            + self.embedded_nul
            + self.invalid_utf8
            + self.unterminated_quote
            + self.malformed
    }
}

impl fmt::Display for SkipCounts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reasons = [
            SkipReason::OversizedField,
            SkipReason::EmbeddedNul,
            SkipReason::InvalidUtf8,
            SkipReason::UnterminatedQuote,
            SkipReason::Malformed,
        ];
        let parts = reasons
            .iter()
            .filter(|&&r| self.get(r) > 0)
            .map(|&r| format!("{} {}", self.get(r), r))
            .collect_vec();
        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Final counts of a run.
///
/// `seen` includes skipped records; `processed` does not.
/// The header row is never counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Summary {
    pub seen: u64,
    pub processed: u64,
    pub kept: u64,
    pub repaired: u64,
    pub skipped: SkipCounts,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} processed, {} kept, {} repaired, skipped: {}",
            self.seen, self.processed, self.kept, self.repaired, self.skipped
        )
    }
}

/// Write a summary as JSON.
pub fn write_summary_file<T: Serialize>(path: &str, summary: &T, compact: bool) -> Result<()> {
    let file =
        fs::File::create(path).map_err(|e| errors::invalid_output(format!("{path}: {e}")))?;
    let mut writer = io::BufWriter::new(file);
    if compact {
        serde_json::to_writer(&mut writer, summary)?;
    } else {
        serde_json::to_writer_pretty(&mut writer, summary)?;
    }
    writer
        .flush()
        .map_err(|e| errors::invalid_output(format!("{path}: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn skip_counts() {
        let mut s = SkipCounts::default();
        s.add(SkipReason::EmbeddedNul);
        s.add(SkipReason::EmbeddedNul);
        s.add(SkipReason::Malformed);
        assert_eq!(s.total(), 3);
        assert_eq!(s.get(SkipReason::EmbeddedNul), 2);
        assert_eq!(format!("{s}"), "2 embedded NUL byte, 1 malformed record");
        assert_eq!(format!("{}", SkipCounts::default()), "none");
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn summary_write_failure_is_reported() {
        // Writes to /dev/full fail only when the buffer is flushed.
        let err = write_summary_file("/dev/full", &Summary::default(), true)
            .err()
            .unwrap();
        assert!(err.is::<errors::InvalidOutput>());
    }

    #[test]
    fn display_summary() {
        let s = Summary {
            seen: 10,
            processed: 9,
            kept: 4,
            repaired: 1,
            skipped: SkipCounts {
                oversized_field: 1,
                ..SkipCounts::default()
            },
        };
        assert_eq!(
            format!("{s}"),
            "10 rows read, 9 processed, 4 kept, 1 repaired, skipped: 1 oversized field"
        );
    }
}
