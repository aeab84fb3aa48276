//! Removing rows written by outlier reviewers.

use crate::errors::Result;
use crate::outliers::OutlierSet;
use crate::settings::StreamSettings;
use crate::stream::{self, RowStream};
use crate::summary::Summary;
use crate::table::Table;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default identifier column.
pub const DEFAULT_COLUMN: &str = "author.steamid";

pub struct FilterArgs<'a> {
    pub infile: &'a Path,
    pub outfile: &'a Path,
    pub column: &'a str,
    pub outliers: &'a OutlierSet,
    pub settings: StreamSettings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterSummary {
    /// Reading the input.
    pub read: Summary,
    /// Rows written to the output.
    pub rows: u64,
    /// Rows removed because of their identifier.
    pub removed: u64,
}

/// Copy `infile` to `outfile` without the rows of outlier reviewers.
pub fn filter_file(args: &FilterArgs) -> Result<FilterSummary> {
    info!("reading {}", args.infile.display());
    let stream = RowStream::open(args.infile, args.settings)?;
    let (table, read) = Table::read(stream)?;
    info!("{} rows in memory", table.rows.len());
    let filtered = table.without_ids(args.column, args.outliers)?;
    let removed = (table.rows.len() - filtered.rows.len()) as u64;
    info!(
        "removing {removed} rows with '{}' in a set of {} identifiers",
        args.column,
        args.outliers.len()
    );
    let writer = stream::create_output(args.outfile)?;
    filtered.write_to(writer, &args.settings)?;
    Ok(FilterSummary {
        read,
        rows: filtered.rows.len() as u64,
        removed,
    })
}
