//! Spreads a compound `key]timestamp|key]timestamp|...` CSV column into one
//! timestamp column per key, producing a rectangular table with a stable
//! column order.
mod config;
mod denormalize;
mod error;
mod flush;
mod headers;
mod input;
mod row_stream;
mod segment;
mod timestamp;
mod unique;

pub mod logging;
pub mod mock;

pub use config::{parse_forced_headers, Columns, DEFAULT_COMPOUND_COLUMN, DEFAULT_ID_COLUMN};
pub use denormalize::{project, scan, ParsedRow, Scan, Table};
pub use error::{Error, Result, RowResult};
pub use flush::{flush, write_table, FlushTarget};
pub use headers::{HeaderMismatch, Headers};
pub use input::{encoding_from_label, InputStream, ReaderSource};
pub use row_stream::{get_field, RowStream};
pub use segment::Segment;
pub use timestamp::{normalize as normalize_timestamp, TimestampError};
pub use unique::UniqueNames;

pub type Row = csv::StringRecord;
