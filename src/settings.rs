//! Settings shared by all pipelines.

use crate::decode::Decoding;
use clap::{Args, ValueEnum};

/// Default interval between progress reports, in records.
pub const DEFAULT_PROGRESS_EVERY: u64 = 1_000_000;

/// Default limit for the length of a single field, in bytes.
pub const DEFAULT_MAX_FIELD_LEN: usize = 2_147_483_647;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn terminator(self) -> csv::Terminator {
        match self {
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
            LineEnding::Crlf => csv::Terminator::CRLF,
        }
    }
}

/// How to read and write a stream of records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamSettings {
    /// Report progress after this many records; 0 disables progress reports.
    pub progress_every: u64,

    /// Records with a longer field are skipped.
    pub max_field_len: usize,

    /// What to do with bytes that are not valid UTF-8.
    pub decoding: Decoding,

    /// Line terminator used in the output.
    pub line_ending: LineEnding,
}

impl Default for StreamSettings {
    fn default() -> Self {
        StreamSettings {
            progress_every: DEFAULT_PROGRESS_EVERY,
            max_field_len: DEFAULT_MAX_FIELD_LEN,
            decoding: Decoding::default(),
            line_ending: LineEnding::default(),
        }
    }
}

/// Command line options common to all binaries.
#[derive(Args, Debug)]
pub struct StreamOpts {
    /// Report progress every N rows (0 = never)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PROGRESS_EVERY)]
    pub progress_every: u64,
    /// Skip rows with a field longer than this (bytes)
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_FIELD_LEN)]
    pub max_field_len: usize,
    /// How to handle invalid UTF-8
    #[arg(long, value_enum, default_value_t = Decoding::Replace)]
    pub decoding: Decoding,
    /// Line terminator for the output file
    #[arg(long, value_enum, default_value_t = LineEnding::Lf)]
    pub line_ending: LineEnding,
    /// Write a summary of the run as a JSON file
    #[arg(long, value_name = "PATH")]
    pub summary_file: Option<String>,
    /// Produce a compact JSON summary
    #[arg(long)]
    pub compact: bool,
}

impl StreamOpts {
    pub fn settings(&self) -> StreamSettings {
        StreamSettings {
            progress_every: self.progress_every,
            max_field_len: self.max_field_len,
            decoding: self.decoding,
            line_ending: self.line_ending,
        }
    }
}
