use std::path::PathBuf;
use std::result;

use thiserror::Error;

use crate::headers::HeaderMismatch;
use crate::timestamp::TimestampError;

/// An error found somewhere in the denormalization chain. Every variant
/// aborts the whole run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("at least one input is required")]
    NoInput,

    #[error("inconsistent headers among files in {0:?}")]
    InconsistentHeaders(PathBuf),

    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("could not decode field: {0}")]
    Decode(String),

    /// A required column is absent from an input row
    #[error("row {row}: required column '{column}' not found")]
    MissingColumn { column: String, row: usize },

    /// A compound field segment has no `]` separator
    #[error("row {row}: segment '{segment}' has no ']' separator")]
    MalformedSegment { segment: String, row: usize },

    #[error("row {row}: timestamp '{value}' does not match the expected format")]
    TimestampFormat {
        value: String,
        row: usize,
        #[source]
        source: TimestampError,
    },

    #[error("forced headers are not the same as the headers found on the data: {0}")]
    HeaderMismatch(HeaderMismatch),

    #[error("invalid forced header list: {0}")]
    InvalidForcedHeaders(String),
}

pub type Result<T> = result::Result<T, Error>;

/// The type that actually flows out of a row stream. Either a row or an
/// error.
pub type RowResult = result::Result<crate::Row, Error>;
