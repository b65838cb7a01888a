use crate::error::{Error, Result};

pub const DEFAULT_ID_COLUMN: &str = "UniqueID";
pub const DEFAULT_COMPOUND_COLUMN: &str = "string_agg";

/// Names of the two input columns the denormalizer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    /// Copied as is to the output, always as the first discovered header
    pub id: String,

    /// Holds the `key]timestamp|...` compound field
    pub compound: String,
}

impl Columns {
    pub fn new(id: &str, compound: &str) -> Columns {
        Columns {
            id: id.to_string(),
            compound: compound.to_string(),
        }
    }
}

impl Default for Columns {
    fn default() -> Columns {
        Columns::new(DEFAULT_ID_COLUMN, DEFAULT_COMPOUND_COLUMN)
    }
}

/// Parses a forced header list as given on the command line.
///
/// An empty (or blank) string means no forced headers. A string starting
/// with `[` must be a JSON array of strings, anything else is read as a
/// comma separated list. Names are trimmed and may not be empty.
pub fn parse_forced_headers(spec: &str) -> Result<Option<Vec<String>>> {
    let spec = spec.trim();

    if spec.is_empty() {
        return Ok(None);
    }

    let names: Vec<String> = if spec.starts_with('[') {
        serde_json::from_str(spec).map_err(|e| Error::InvalidForcedHeaders(e.to_string()))?
    } else {
        spec.split(',').map(|name| name.trim().to_string()).collect()
    };

    if let Some(position) = names.iter().position(|name| name.trim().is_empty()) {
        return Err(Error::InvalidForcedHeaders(format!(
            "empty header name at position {}",
            position
        )));
    }

    Ok(Some(names))
}
