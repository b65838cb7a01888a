use csv::StringRecordIter;
use std::cmp::PartialEq;
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::Row;

/// A structure for keeping relationship between the headers and their
/// positions. Names are unique and keep the order in which they were first
/// added.
#[derive(Debug, Clone, PartialEq)]
pub struct Headers {
    indexes: HashMap<String, usize>,
    names: Row,
}

/// Differences between a forced header list and the discovered headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMismatch {
    /// Discovered on the data but absent from the forced list
    pub missing: Vec<String>,

    /// Present in the forced list but never discovered on the data
    pub unexpected: Vec<String>,

    /// Repeated inside the forced list
    pub duplicated: Vec<String>,
}

impl HeaderMismatch {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.duplicated.is_empty()
    }
}

impl fmt::Display for HeaderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if !self.missing.is_empty() {
            parts.push(format!("missing [{}]", self.missing.join(", ")));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("unexpected [{}]", self.unexpected.join(", ")));
        }
        if !self.duplicated.is_empty() {
            parts.push(format!("duplicated [{}]", self.duplicated.join(", ")));
        }

        write!(f, "{}", parts.join("; "))
    }
}

impl Headers {
    /// Builds the header set from a row. Repeated names keep only their
    /// first position.
    pub fn from_row(row: Row) -> Headers {
        let mut headers = Headers {
            indexes: HashMap::new(),
            names: Row::with_capacity(row.as_slice().len(), row.len()),
        };

        for entry in row.iter() {
            headers.add(entry);
        }

        headers
    }

    /// Appends `colname` unless it is already present. Returns whether it
    /// was added.
    pub fn add(&mut self, colname: &str) -> bool {
        if self.indexes.contains_key(colname) {
            return false;
        }

        self.names.push_field(colname);
        self.indexes
            .insert(colname.to_string(), self.names.len() - 1);

        true
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_row(&self) -> &Row {
        &self.names
    }

    pub fn get(&self, field: &str) -> Option<usize> {
        self.indexes.get(field).copied()
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    pub fn iter(&self) -> StringRecordIter {
        self.names.iter()
    }

    /// Compares a forced header list against these headers ignoring order.
    /// Nothing is modified; on success the caller decides what to do with
    /// the forced order.
    pub fn check_forced<S: AsRef<str>>(&self, forced: &[S]) -> Result<(), HeaderMismatch> {
        let mut seen = HashSet::new();
        let mut mismatch = HeaderMismatch::default();

        for name in forced.iter().map(AsRef::as_ref) {
            if !seen.insert(name) {
                if !mismatch.duplicated.iter().any(|d| d == name) {
                    mismatch.duplicated.push(name.to_string());
                }
            } else if !self.contains_key(name) {
                mismatch.unexpected.push(name.to_string());
            }
        }

        for name in self.iter() {
            if !seen.contains(name) {
                mismatch.missing.push(name.to_string());
            }
        }

        if mismatch.is_empty() {
            Ok(())
        } else {
            Err(mismatch)
        }
    }
}

impl PartialEq<Headers> for Row {
    fn eq(&self, other: &Headers) -> bool {
        self == other.as_row()
    }
}
