//! Keeping the first rows of a file.

use crate::errors::Result;
use crate::settings::StreamSettings;
use crate::stream::{self, RowStream, Selector};
use crate::summary::Summary;
use csv::StringRecord;
use log::info;
use std::path::Path;

/// Default number of data rows to keep.
pub const DEFAULT_ROWS: u64 = 50_000;

/// Keeps the first `limit` valid rows, then stops reading.
pub struct Head {
    limit: u64,
    taken: u64,
}

impl Head {
    pub fn new(limit: u64) -> Head {
        Head { limit, taken: 0 }
    }
}

impl Selector for Head {
    fn select(&mut self, _record: &StringRecord) -> bool {
        self.taken += 1;
        true
    }

    fn is_done(&self) -> bool {
        self.taken >= self.limit
    }
}

pub struct HeadArgs<'a> {
    pub infile: &'a Path,
    pub outfile: &'a Path,
    /// Number of data rows, not counting the header.
    pub rows: u64,
    pub settings: StreamSettings,
}

/// Write the header and the first `rows` data rows of `infile` to `outfile`.
pub fn head_file(args: &HeadArgs) -> Result<Summary> {
    info!("reading from {}", args.infile.display());
    let rows = RowStream::open(args.infile, args.settings)?;
    let writer = stream::create_output(args.outfile)?;
    rows.copy_to(writer, &mut Head::new(args.rows))
}
