//! Sets of identifiers to exclude.
//!
//! Identifiers compare by value: anything that parses as an integer is
//! compared as an integer, so `"76561198848008157"` and `76561198848008157`
//! are the same identifier. Everything else is compared as exact text after
//! trimming surrounding whitespace.

use crate::errors::{self, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Steam IDs of reviewers excluded by default.
pub const DEFAULT_OUTLIERS: [u64; 4] = [
    76561198848008157,
    76561198070649181,
    76561198127787009,
    76561198103272004,
];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum IdKey {
    Int(i128),
    Text(String),
}

impl IdKey {
    fn parse(s: &str) -> IdKey {
        let s = s.trim();
        match s.parse::<i128>() {
            Ok(v) => IdKey::Int(v),
            Err(_) => IdKey::Text(s.to_owned()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutlierSet {
    ids: HashSet<IdKey>,
}

impl OutlierSet {
    pub fn new<I, S>(ids: I) -> OutlierSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = OutlierSet::default();
        set.extend(ids);
        set
    }

    pub fn builtin() -> OutlierSet {
        OutlierSet::new(DEFAULT_OUTLIERS.iter().map(|id| id.to_string()))
    }

    pub fn extend<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ids
            .extend(ids.into_iter().map(|s| IdKey::parse(s.as_ref())));
    }

    /// Parse a JSON array of numbers and strings.
    pub fn from_json(text: &str) -> Result<OutlierSet> {
        let values: Vec<Value> = serde_json::from_str(text)?;
        let mut ids = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::Number(n) => ids.push(n.to_string()),
                Value::String(s) => ids.push(s),
                other => {
                    return Err(errors::invalid_input(format!(
                        "identifier must be a number or a string, got {other}"
                    )));
                }
            }
        }
        Ok(OutlierSet::new(ids))
    }

    pub fn load(path: &Path) -> Result<OutlierSet> {
        let text = fs::read_to_string(path)
            .map_err(|e| errors::invalid_input(format!("{}: {e}", path.display())))?;
        OutlierSet::from_json(&text)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.ids.contains(&IdKey::parse(value))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
