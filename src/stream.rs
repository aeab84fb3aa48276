//! Single-pass streaming over a CSV file.
//!
//! A [RowStream] reads the header eagerly and then hands every data record
//! to a [Selector], which decides whether the record is kept. Records that
//! cannot be read are skipped one at a time and counted in the [Summary];
//! they never end the stream.

use crate::decode::{self, RecordOutcome, SkipReason};
use crate::errors::{self, EmptyInput, NotFound, Result};
use crate::quotes::{self, QuoteTracker};
use crate::settings::StreamSettings;
use crate::summary::Summary;
use csv::{ByteRecord, StringRecord};
use log::{debug, info};
use std::path::Path;
use std::{fs, io};

/// Decides which records are kept.
pub trait Selector {
    /// Called once for each valid record, in input order.
    fn select(&mut self, record: &StringRecord) -> bool;

    /// If true, reading stops before the next record.
    fn is_done(&self) -> bool {
        false
    }
}

/// Keeps every record.
pub struct Everything;

impl Selector for Everything {
    fn select(&mut self, _record: &StringRecord) -> bool {
        true
    }
}

pub struct RowStream<R: io::Read> {
    reader: csv::Reader<QuoteTracker<R>>,
    header: StringRecord,
    bom: bool,
    settings: StreamSettings,
    raw: ByteRecord,
}

impl RowStream<fs::File> {
    /// Open a file and read its header.
    pub fn open(path: &Path, settings: StreamSettings) -> Result<Self> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(NotFound(path.display().to_string()).into());
            }
            Err(e) => return Err(errors::invalid_input(format!("{}: {e}", path.display()))),
        };
        Self::from_reader(file, settings).map_err(|e| {
            if e.is::<EmptyInput>() {
                EmptyInput(path.display().to_string()).into()
            } else {
                e
            }
        })
    }
}

impl<R: io::Read> RowStream<R> {
    pub fn from_reader(rdr: R, settings: StreamSettings) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(QuoteTracker::new(rdr));
        let mut raw = ByteRecord::new();
        if !reader.read_byte_record(&mut raw)? {
            return Err(EmptyInput("input".to_owned()).into());
        }
        if unterminated(&reader) {
            return Err(errors::invalid_input(format!(
                "unreadable header: {}",
                SkipReason::UnterminatedQuote
            )));
        }
        let header = match decode::classify(&raw, settings.decoding, settings.max_field_len) {
            RecordOutcome::Valid { record, .. } => record,
            RecordOutcome::Skipped(reason) => {
                return Err(errors::invalid_input(format!("unreadable header: {reason}")));
            }
        };
        debug!("header: {} columns", header.len());
        let bom = reader.get_ref().has_bom();
        Ok(RowStream {
            reader,
            header,
            bom,
            settings,
            raw,
        })
    }

    pub fn header(&self) -> &StringRecord {
        &self.header
    }

    /// True if the input starts with a UTF-8 byte order mark.
    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// Read the next data record, or `None` at the end of the input.
    ///
    /// Only I/O failures are returned as errors.
    pub fn next_outcome(&mut self) -> Result<Option<RecordOutcome>> {
        match self.reader.read_byte_record(&mut self.raw) {
            Ok(false) => Ok(None),
            Ok(true) if unterminated(&self.reader) => {
                Ok(Some(RecordOutcome::Skipped(SkipReason::UnterminatedQuote)))
            }
            Ok(true) => Ok(Some(decode::classify(
                &self.raw,
                self.settings.decoding,
                self.settings.max_field_len,
            ))),
            Err(e) if e.is_io_error() => Err(e.into()),
            Err(e) => {
                debug!("{e}");
                Ok(Some(RecordOutcome::Skipped(SkipReason::Malformed)))
            }
        }
    }

    fn line(&self) -> u64 {
        self.raw.position().map_or(0, |p| p.line())
    }

    /// Feed all data records through `selector`, passing kept ones to `emit`.
    pub fn scan<S, F>(&mut self, selector: &mut S, mut emit: F) -> Result<Summary>
    where
        S: Selector,
        F: FnMut(StringRecord) -> Result<()>,
    {
        let mut summary = Summary::default();
        loop {
            if selector.is_done() {
                info!("row limit reached after {} rows", summary.seen);
                break;
            }
            let outcome = match self.next_outcome()? {
                None => break,
                Some(outcome) => outcome,
            };
            summary.seen += 1;
            match outcome {
                RecordOutcome::Valid { record, repaired } => {
                    summary.processed += 1;
                    if repaired {
                        summary.repaired += 1;
                    }
                    if selector.select(&record) {
                        emit(record)?;
                        summary.kept += 1;
                    }
                }
                RecordOutcome::Skipped(reason) => {
                    debug!("skipping record at line {}: {reason}", self.line());
                    summary.skipped.add(reason);
                }
            }
            if report_due(summary.seen, self.settings.progress_every) {
                info!(
                    "processed {} rows... (kept {})",
                    summary.seen, summary.kept
                );
            }
        }
        Ok(summary)
    }

    /// Write the header and every selected record to `writer`.
    pub fn copy_to<W, S>(mut self, mut writer: W, selector: &mut S) -> Result<Summary>
    where
        W: io::Write,
        S: Selector,
    {
        if self.bom {
            writer.write_all(quotes::BOM)?;
        }
        let mut out = csv_writer(writer, &self.settings);
        out.write_record(&self.header)?;
        let summary = self.scan(selector, |record| Ok(out.write_record(&record)?))?;
        out.flush()?;
        Ok(summary)
    }
}

/// The last record ran into the end of the input inside a quoted field.
fn unterminated<R: io::Read>(reader: &csv::Reader<QuoteTracker<R>>) -> bool {
    let tracker = reader.get_ref();
    tracker.at_eof() && tracker.in_quotes()
}

/// Progress is reported every `every` records; never if `every` is 0.
fn report_due(seen: u64, every: u64) -> bool {
    every > 0 && seen % every == 0
}

pub(crate) fn csv_writer<W: io::Write>(writer: W, settings: &StreamSettings) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(settings.line_ending.terminator())
        .from_writer(writer)
}

/// Create the destination file.
pub fn create_output(path: &Path) -> Result<io::BufWriter<fs::File>> {
    match fs::File::create(path) {
        Ok(file) => Ok(io::BufWriter::new(file)),
        Err(e) => Err(errors::invalid_output(format!("{}: {e}", path.display()))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::Decoding;
    use crate::settings::LineEnding;

    fn settings() -> StreamSettings {
        StreamSettings {
            progress_every: 2,
            ..StreamSettings::default()
        }
    }

    fn copy_all(input: &[u8], settings: StreamSettings) -> (String, Summary) {
        let stream = RowStream::from_reader(input, settings).unwrap();
        let mut out = Vec::new();
        let summary = stream.copy_to(&mut out, &mut Everything).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn header_is_copied() {
        let (out, summary) = copy_all(b"app_id,review\n", settings());
        assert_eq!(out, "app_id,review\n");
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn empty_input() {
        let err = RowStream::from_reader(&b""[..], settings()).err().unwrap();
        assert!(err.is::<EmptyInput>());
    }

    #[test]
    fn quoted_fields_survive() {
        let input = b"id,review\n1,\"multi\nline, with comma\"\n2,\"say \"\"hi\"\"\"\n";
        let (out, summary) = copy_all(input, settings());
        assert_eq!(out, String::from_utf8(input.to_vec()).unwrap());
        assert_eq!(summary.seen, 2);
        assert_eq!(summary.kept, 2);
    }

    #[test]
    fn ragged_rows_are_kept() {
        let (out, summary) = copy_all(b"a,b,c\n1\n2,3,4,5\n", settings());
        assert_eq!(out, "a,b,c\n1\n2,3,4,5\n");
        assert_eq!(summary.kept, 2);
    }

    #[test]
    fn bad_records_do_not_stop_the_stream() {
        let input = b"a,b\n1,ok\n2,way too long\n3,n\0l\n4,ok\n";
        let s = StreamSettings {
            max_field_len: 5,
            ..settings()
        };
        let (out, summary) = copy_all(input, s);
        assert_eq!(out, "a,b\n1,ok\n4,ok\n");
        assert_eq!(summary.seen, 4);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.kept, 2);
        assert_eq!(summary.skipped.oversized_field, 1);
        assert_eq!(summary.skipped.embedded_nul, 1);
    }

    #[test]
    fn strict_decoding_skips() {
        let input = b"a,b\n1,caf\xe9\n2,cafe\n";
        let s = StreamSettings {
            decoding: Decoding::Strict,
            ..settings()
        };
        let (out, summary) = copy_all(input, s);
        assert_eq!(out, "a,b\n2,cafe\n");
        assert_eq!(summary.skipped.invalid_utf8, 1);
        assert_eq!(summary.processed, 1);
    }

    #[test]
    fn replace_decoding_repairs() {
        let (out, summary) = copy_all(b"a,b\n1,caf\xe9\n", settings());
        assert_eq!(out, "a,b\n1,caf\u{fffd}\n");
        assert_eq!(summary.repaired, 1);
        assert_eq!(summary.kept, 1);
    }

    #[test]
    fn unreadable_header() {
        let s = StreamSettings {
            decoding: Decoding::Strict,
            ..settings()
        };
        let err = RowStream::from_reader(&b"a\xff,b\n1,2\n"[..], s).err().unwrap();
        assert!(err.is::<errors::InvalidInput>());
    }

    #[test]
    fn crlf_output() {
        let s = StreamSettings {
            line_ending: LineEnding::Crlf,
            ..settings()
        };
        let (out, _) = copy_all(b"a,b\n1,2\n3,4\n", s);
        assert_eq!(out, "a,b\r\n1,2\r\n3,4\r\n");
    }

    #[test]
    fn unterminated_quote_is_skipped() {
        let (out, summary) = copy_all(b"a,b\n1,\"unterminated\n2,ok\n3,ok\n", settings());
        assert_eq!(out, "a,b\n");
        assert_eq!(summary.seen, 1);
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.kept, 0);
        assert_eq!(summary.skipped.unterminated_quote, 1);
    }

    #[test]
    fn unterminated_quote_after_good_rows() {
        let input = b"a,b\n1,\"closed\nquote\"\n2,ok\n3,\"open";
        let (out, summary) = copy_all(input, settings());
        assert_eq!(out, "a,b\n1,\"closed\nquote\"\n2,ok\n");
        assert_eq!(summary.seen, 3);
        assert_eq!(summary.kept, 2);
        assert_eq!(summary.skipped.unterminated_quote, 1);
    }

    #[test]
    fn closing_quote_at_end_of_input() {
        let (out, summary) = copy_all(b"a,b\n1,\"x\"", settings());
        assert_eq!(out, "a,b\n1,x\n");
        assert_eq!(summary.kept, 1);
        assert_eq!(summary.skipped.total(), 0);
    }

    #[test]
    fn unterminated_quote_in_header() {
        let err = RowStream::from_reader(&b"a,\"b\n1,2\n"[..], settings())
            .err()
            .unwrap();
        assert!(err.is::<errors::InvalidInput>());
    }

    #[test]
    fn byte_order_mark_is_kept() {
        let (out, summary) = copy_all(b"\xef\xbb\xbfa,b\n1,2\n", settings());
        assert_eq!(out, "\u{feff}a,b\n1,2\n");
        assert_eq!(summary.kept, 1);
        let stream = RowStream::from_reader(&b"\xef\xbb\xbfa,b\n"[..], settings()).unwrap();
        assert!(stream.has_bom());
        assert_eq!(stream.header(), &StringRecord::from(vec!["a", "b"]));
        let stream = RowStream::from_reader(&b"a,b\n"[..], settings()).unwrap();
        assert!(!stream.has_bom());
    }

    #[test]
    fn progress_interval() {
        assert!(report_due(1_000_000, 1_000_000));
        assert!(report_due(2_000_000, 1_000_000));
        assert!(!report_due(999_999, 1_000_000));
        assert!(!report_due(1_000_001, 1_000_000));
        assert!(report_due(7, 1));
    }

    #[test]
    fn progress_disabled() {
        for seen in [0, 1, 1_000_000] {
            assert!(!report_due(seen, 0));
        }
    }

    #[test]
    fn crlf_input_normalized() {
        let (out, summary) = copy_all(b"a,b\r\n1,2\r\n\r\n3,4\r\n", settings());
        assert_eq!(out, "a,b\n1,2\n3,4\n");
        assert_eq!(summary.seen, 2);
    }
}
