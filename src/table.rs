//! Fully materialized tables.

use crate::errors::{self, Result};
use crate::outliers::OutlierSet;
use crate::quotes;
use crate::settings::StreamSettings;
use crate::stream::{self, Everything, RowStream};
use crate::summary::Summary;
use csv::StringRecord;
use itertools::Itertools;
use std::io;

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub header: StringRecord,
    pub rows: Vec<StringRecord>,
    /// Write a UTF-8 byte order mark before the header.
    pub bom: bool,
}

impl Table {
    /// Read all valid rows of a stream into memory.
    pub fn read<R: io::Read>(mut stream: RowStream<R>) -> Result<(Table, Summary)> {
        let mut rows = Vec::new();
        let summary = stream.scan(&mut Everything, |record| {
            rows.push(record);
            Ok(())
        })?;
        let table = Table {
            header: stream.header().clone(),
            rows,
            bom: stream.has_bom(),
        };
        Ok((table, summary))
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        match self.header.iter().position(|h| h == name) {
            Some(i) => Ok(i),
            None => Err(errors::invalid_argument(format!(
                "no column '{name}', available columns: {}",
                self.header.iter().map(|h| format!("'{h}'")).join(", ")
            ))),
        }
    }

    /// A new table without the rows whose value in `column` is in `outliers`.
    ///
    /// Rows too short to have a value in `column` are kept.
    pub fn without_ids(&self, column: &str, outliers: &OutlierSet) -> Result<Table> {
        let idx = self.column_index(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|row| row.get(idx).is_none_or(|id| !outliers.contains(id)))
            .cloned()
            .collect_vec();
        Ok(Table {
            header: self.header.clone(),
            rows,
            bom: self.bom,
        })
    }

    pub fn write_to<W: io::Write>(&self, mut writer: W, settings: &StreamSettings) -> Result<()> {
        if self.bom {
            writer.write_all(quotes::BOM)?;
        }
        let mut out = stream::csv_writer(writer, settings);
        out.write_record(&self.header)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(input: &str) -> Table {
        let stream = RowStream::from_reader(input.as_bytes(), StreamSettings::default()).unwrap();
        Table::read(stream).unwrap().0
    }

    fn rec(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn read_skips_bad_rows() {
        let stream =
            RowStream::from_reader(&b"a,b\n1,x\n2,\0\n3,z\n"[..], StreamSettings::default())
                .unwrap();
        let (t, summary) = Table::read(stream).unwrap();
        assert_eq!(t.header, rec(&["a", "b"]));
        assert_eq!(t.rows, vec![rec(&["1", "x"]), rec(&["3", "z"])]);
        assert_eq!(summary.seen, 3);
        assert_eq!(summary.kept, 2);
    }

    #[test]
    fn filter_example() {
        let t = table("a,b\n1,x\n2,y\n3,z\n");
        let f = t.without_ids("a", &OutlierSet::new(["2"])).unwrap();
        assert_eq!(f.header, rec(&["a", "b"]));
        assert_eq!(f.rows, vec![rec(&["1", "x"]), rec(&["3", "z"])]);
        // The source table is untouched.
        assert_eq!(t.rows.len(), 3);
    }

    #[test]
    fn filter_second_column() {
        let t = table("review,author.steamid\ngood,76561198848008157\nbad,5\nmeh,76561198070649181\n");
        let f = t.without_ids("author.steamid", &OutlierSet::builtin()).unwrap();
        assert_eq!(f.rows, vec![rec(&["bad", "5"])]);
    }

    #[test]
    fn short_rows_are_kept() {
        let t = table("a,b\n1,x\n2\nx\n");
        let f = t.without_ids("b", &OutlierSet::new(["x"])).unwrap();
        assert_eq!(f.rows, vec![rec(&["2"]), rec(&["x"])]);
    }

    #[test]
    fn unknown_column() {
        let t = table("a,b\n1,x\n");
        let err = t.without_ids("c", &OutlierSet::builtin()).err().unwrap();
        assert!(err.is::<errors::InvalidArgument>());
        assert!(err.to_string().contains("'a', 'b'"));
    }

    #[test]
    fn empty_set_keeps_everything() {
        let t = table("a,b\n1,x\n2,y\n");
        let f = t.without_ids("a", &OutlierSet::default()).unwrap();
        assert_eq!(f, t);
    }

    #[test]
    fn write_round_trip() {
        let t = table("a,b\n1,\"x, y\"\n");
        let mut out = Vec::new();
        t.write_to(&mut out, &StreamSettings::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,b\n1,\"x, y\"\n");
    }

    #[test]
    fn byte_order_mark_is_kept() {
        let t = table("\u{feff}id,b\n1,x\n2,y\n");
        assert!(t.bom);
        assert_eq!(t.header, rec(&["id", "b"]));
        let f = t.without_ids("id", &OutlierSet::new(["2"])).unwrap();
        let mut out = Vec::new();
        f.write_to(&mut out, &StreamSettings::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\u{feff}id,b\n1,x\n");
    }
}
