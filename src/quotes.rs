//! Tracking quoting state of the raw input.
//!
//! The `csv` parser ends a quoted field at the end of the input without
//! complaint, so an unterminated quote silently swallows every row after
//! it. [QuoteTracker] follows the same quoting rules on the bytes that pass
//! through it, so that a record which ran into the end of the input with
//! its quote still open can be recognized.

use std::io;

pub(crate) const BOM: &[u8] = b"\xef\xbb\xbf";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lex {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

impl Lex {
    fn step(self, b: u8) -> Lex {
        match (self, b) {
            (Lex::FieldStart, b'"') => Lex::Quoted,
            (Lex::FieldStart | Lex::Unquoted | Lex::QuoteInQuoted, b',' | b'\n' | b'\r') => {
                Lex::FieldStart
            }
            (Lex::FieldStart | Lex::Unquoted, _) => Lex::Unquoted,
            (Lex::Quoted, b'"') => Lex::QuoteInQuoted,
            (Lex::Quoted, _) => Lex::Quoted,
            (Lex::QuoteInQuoted, b'"') => Lex::Quoted,
            (Lex::QuoteInQuoted, _) => Lex::Unquoted,
        }
    }
}

pub struct QuoteTracker<R> {
    inner: R,
    state: Lex,
    offset: u64,
    bom: bool,
    eof: bool,
}

impl<R: io::Read> QuoteTracker<R> {
    pub fn new(inner: R) -> QuoteTracker<R> {
        QuoteTracker {
            inner,
            state: Lex::FieldStart,
            offset: 0,
            bom: true,
            eof: false,
        }
    }

    fn feed(&mut self, buf: &[u8]) {
        for &b in buf {
            let i = self.offset as usize;
            if self.offset < BOM.len() as u64 {
                self.bom &= BOM[i] == b;
                if self.bom {
                    self.offset += 1;
                    continue;
                }
            }
            self.offset += 1;
            self.state = self.state.step(b);
        }
    }

    /// True once the end of the input has been reached.
    pub fn at_eof(&self) -> bool {
        self.eof
    }

    /// True if a quoted field is open at the current position.
    pub fn in_quotes(&self) -> bool {
        self.state == Lex::Quoted
    }

    /// True if the input starts with a UTF-8 byte order mark.
    pub fn has_bom(&self) -> bool {
        self.bom && self.offset >= BOM.len() as u64
    }
}

impl<R: io::Read> io::Read for QuoteTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.eof = true;
        }
        self.feed(&buf[..n]);
        Ok(n)
    }
}
