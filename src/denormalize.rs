//! Spreads the compound column of every row into one column per key.
//!
//! Works in two phases. [`scan`] reads every row, parses its compound field
//! and discovers the headers. [`project`] lays every parsed row against the
//! final headers, filling the gaps with empty strings.
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::{
    config::Columns,
    error::{Error, Result, RowResult},
    get_field,
    segment::segments,
    timestamp,
    unique::UniqueNames,
    Headers, Row,
};

/// The fields found on a single input row, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRow {
    indexes: HashMap<String, usize>,
    fields: Vec<(String, String)>,
}

impl ParsedRow {
    /// Sets `name` to `value`, replacing any previous value of `name`.
    pub fn insert(&mut self, name: String, value: String) {
        match self.indexes.get(&name) {
            Some(&index) => self.fields[index].1 = value,
            None => {
                self.indexes.insert(name.clone(), self.fields.len());
                self.fields.push((name, value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.indexes
            .get(name)
            .map(|&index| self.fields[index].1.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Result of the scan phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    rows: Vec<ParsedRow>,
    headers: Headers,
}

impl Scan {
    pub fn rows(&self) -> &[ParsedRow] {
        &self.rows
    }

    /// Identifier column first, then every generated column in the order it
    /// was first seen.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn project(&self, forced: Option<&[String]>) -> Result<Table> {
        project(&self.rows, &self.headers, forced)
    }
}

/// A rectangular result: every row has exactly one field per header.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Row,
    rows: Vec<Row>,
}

impl Table {
    pub fn headers(&self) -> &Row {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The header row followed by every data row.
    pub fn records(&self) -> impl Iterator<Item = &Row> {
        std::iter::once(&self.headers).chain(self.rows.iter())
    }
}

fn parse_row(
    index: usize,
    headers: &Headers,
    row: &Row,
    columns: &Columns,
    names: &mut UniqueNames,
) -> Result<ParsedRow> {
    let missing = |column: &str| Error::MissingColumn {
        column: column.to_string(),
        row: index,
    };

    let id = get_field(headers, row, &columns.id).ok_or_else(|| missing(columns.id.as_str()))?;
    let compound =
        get_field(headers, row, &columns.compound).ok_or_else(|| missing(columns.compound.as_str()))?;

    let mut parsed = ParsedRow::default();

    parsed.insert(columns.id.clone(), id.to_string());

    for segment in segments(compound) {
        let segment = segment.map_err(|raw| Error::MalformedSegment {
            segment: raw.to_string(),
            row: index,
        })?;

        let value = timestamp::normalize(segment.value).map_err(|source| {
            Error::TimestampFormat {
                value: segment.value.to_string(),
                row: index,
                source,
            }
        })?;

        parsed.insert(names.name(segment.key), value);
    }

    Ok(parsed)
}

/// Parses every row of `rows`, whose columns are described by `headers`.
///
/// Fails on the first row that cannot be parsed; nothing is returned for
/// the rows before it.
pub fn scan<I>(headers: &Headers, rows: I, columns: &Columns) -> Result<Scan>
where
    I: IntoIterator<Item = RowResult>,
{
    let mut found = Headers::from_row(Row::from(vec![columns.id.as_str()]));
    let mut parsed_rows = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        let row = row?;

        // suffixes restart on every row
        let mut names = UniqueNames::new();
        let parsed = parse_row(index, headers, &row, columns, &mut names)?;

        for name in parsed.names() {
            found.add(name);
        }

        trace!(row = index, fields = parsed.len(), "parsed row");

        parsed_rows.push(parsed);
    }

    debug!(
        rows = parsed_rows.len(),
        headers = found.len(),
        "scanned input"
    );

    Ok(Scan {
        rows: parsed_rows,
        headers: found,
    })
}

/// Lays every parsed row against the headers.
///
/// When `forced` is given it must hold exactly the same names as `headers`
/// (in any order) and replaces them as the output order. Otherwise the
/// call fails with [`Error::HeaderMismatch`] before building anything.
pub fn project(rows: &[ParsedRow], headers: &Headers, forced: Option<&[String]>) -> Result<Table> {
    let forced_headers;

    let headers = match forced {
        Some(forced) => {
            headers.check_forced(forced).map_err(Error::HeaderMismatch)?;
            forced_headers = Headers::from_row(Row::from(forced.to_vec()));

            &forced_headers
        }
        None => headers,
    };

    let mut table_rows = Vec::with_capacity(rows.len());

    for parsed in rows {
        let mut record = Row::with_capacity(0, headers.len());

        for name in headers.iter() {
            record.push_field(parsed.get(name).unwrap_or(""));
        }

        table_rows.push(record);
    }

    debug!(
        rows = table_rows.len(),
        columns = headers.len(),
        forced = forced.is_some(),
        "projected rows"
    );

    Ok(Table {
        headers: headers.as_row().clone(),
        rows: table_rows,
    })
}
