use csv::Writer;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

use crate::{denormalize::Table, error::Result};

/// Where a table ends up.
#[derive(Debug, Clone, PartialEq)]
pub enum FlushTarget {
    /// A CSV file. Missing parent directories are created.
    Path(PathBuf),
    Stdout,
}

/// Writes the header row and then every row of `table` as CSV.
pub fn write_table<W: io::Write>(table: &Table, writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);

    for record in table.records() {
        writer.write_record(record)?;
    }

    writer.flush()?;

    Ok(())
}

pub fn flush(table: &Table, target: &FlushTarget) -> Result<()> {
    match target {
        FlushTarget::Path(path) => {
            if let Some(dirname) = path.parent() {
                if !dirname.as_os_str().is_empty() {
                    fs::create_dir_all(dirname)?;
                }
            }

            debug!(path = ?path, rows = table.rows().len(), "writing output");

            write_table(table, fs::File::create(path)?)
        }
        FlushTarget::Stdout => {
            let stdout = io::stdout();

            write_table(table, stdout.lock())
        }
    }
}

impl Table {
    pub fn flush(&self, target: &FlushTarget) -> Result<()> {
        flush(self, target)
    }
}
