use csv::{Reader, ReaderBuilder};
use csv::{ByteRecord, ByteRecordsIntoIter};
use encoding::label::encoding_from_whatwg_label;
use encoding::{DecoderTrap, EncodingRef};
use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
    error::{Error, Result, RowResult},
    Headers, Row, RowStream,
};

/// Looks up an encoding by its WHATWG label, like `utf-8` or
/// `windows-1252`.
pub fn encoding_from_label(label: &str) -> Result<EncodingRef> {
    encoding_from_whatwg_label(label).ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

fn decode(data: &ByteRecord, encoding: EncodingRef) -> RowResult {
    let mut row = Row::with_capacity(data.as_slice().len(), data.len());

    for item in data.iter() {
        let field = encoding
            .decode(item, DecoderTrap::Strict)
            .map_err(|e| Error::Decode(e.into_owned()))?;

        row.push_field(&field);
    }

    Ok(row)
}

pub struct ReaderSource {
    reader: Reader<File>,
    path: PathBuf,
    encoding: EncodingRef,
}

impl ReaderSource {
    pub fn from_reader<P: AsRef<Path>>(
        reader: Reader<File>,
        path: P,
        encoding: EncodingRef,
    ) -> ReaderSource {
        ReaderSource {
            reader,
            path: path.as_ref().to_path_buf(),
            encoding,
        }
    }

    /// Rows may have any number of fields: short rows are reported by the
    /// denormalizer as missing a column, fields past the headers are
    /// ignored.
    pub fn from_path<P: AsRef<Path>>(path: P, encoding: EncodingRef) -> Result<ReaderSource> {
        Ok(ReaderSource::from_reader(
            ReaderBuilder::new().flexible(true).from_path(&path)?,
            path,
            encoding,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn headers(&mut self) -> RowResult {
        let data = self.reader.byte_headers()?.clone();

        decode(&data, self.encoding)
    }
}

struct ByteRecordsIntoIterSource {
    records: ByteRecordsIntoIter<File>,
    path: PathBuf,
    encoding: EncodingRef,
}

impl ByteRecordsIntoIterSource {
    fn from_source(source: ReaderSource) -> ByteRecordsIntoIterSource {
        debug!(path = ?source.path, "reading input");

        ByteRecordsIntoIterSource {
            records: source.reader.into_byte_records(),
            path: source.path,
            encoding: source.encoding,
        }
    }
}

/// Reads one or more CSV files one after the other as if they were a
/// single one. Every file must have the same header row.
pub struct InputStream {
    readers: VecDeque<ReaderSource>,
    current_records: ByteRecordsIntoIterSource,
    headers: Headers,
}

impl InputStream {
    pub fn from_sources<I>(sources: I) -> Result<InputStream>
    where
        I: IntoIterator<Item = ReaderSource>,
    {
        let mut sources = sources.into_iter();
        let mut first = sources.next().ok_or(Error::NoInput)?;
        let header_row = first.headers()?;
        let mut readers = VecDeque::new();

        for mut source in sources {
            if source.headers()? != header_row {
                return Err(Error::InconsistentHeaders(source.path));
            }

            readers.push_back(source);
        }

        Ok(InputStream {
            readers,
            current_records: ByteRecordsIntoIterSource::from_source(first),
            headers: Headers::from_row(header_row),
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P, encoding: EncodingRef) -> Result<InputStream> {
        InputStream::from_sources(vec![ReaderSource::from_path(path, encoding)?])
    }
}

impl Iterator for InputStream {
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.current_records.records.next() {
                Some(Ok(reg)) => return Some(decode(&reg, self.current_records.encoding)),
                Some(Err(e)) => return Some(Err(Error::Csv(e))),
                None => match self.readers.pop_front() {
                    Some(rs) => {
                        debug!(path = ?self.current_records.path, "finished input");

                        self.current_records = ByteRecordsIntoIterSource::from_source(rs);
                    }
                    None => return None,
                },
            }
        }
    }
}

impl RowStream for InputStream {
    fn headers(&self) -> &Headers {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::{encoding_from_label, InputStream, ReaderSource};
    use crate::{config::Columns, error::Error, Headers, Row, RowStream};
    use encoding::all::{UTF_8, WINDOWS_1252};

    #[test]
    fn test_read_concatenated() {
        let filenames = ["test/assets/1.csv", "test/assets/2.csv"];
        let input_stream = InputStream::from_sources(
            filenames
                .iter()
                .map(|f| ReaderSource::from_path(f, UTF_8).unwrap()),
        )
        .unwrap();

        assert_eq!(
            *input_stream.headers(),
            Headers::from_row(Row::from(vec!["UniqueID", "string_agg"]))
        );

        let rows: Vec<Row> = input_stream.map(|r| r.unwrap()).collect();

        assert_eq!(
            rows,
            vec![
                Row::from(vec!["1", "A]2020-01-01 10:00:00.0+00"]),
                Row::from(vec!["2", "B]2020-01-02 11:00:00.0+00"]),
                Row::from(vec!["3", "A]2020-01-03 12:00:00.0+00"]),
            ]
        );
    }

    #[test]
    fn test_inconsistent_headers() {
        let result = InputStream::from_sources(vec![
            ReaderSource::from_path("test/assets/1.csv", UTF_8).unwrap(),
            ReaderSource::from_path("test/assets/lifecycle.csv", UTF_8).unwrap(),
        ]);

        match result {
            Err(Error::InconsistentHeaders(path)) => {
                assert_eq!(path.to_str(), Some("test/assets/lifecycle.csv"))
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_no_input() {
        match InputStream::from_sources(Vec::<ReaderSource>::new()) {
            Err(Error::NoInput) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_missing_file() {
        match ReaderSource::from_path("test/assets/no_such_file.csv", UTF_8) {
            Err(Error::Csv(_)) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn different_encoding() {
        let mut input_stream =
            InputStream::from_path("test/assets/windows1252/data.csv", WINDOWS_1252).unwrap();

        assert_eq!(
            *input_stream.headers(),
            Headers::from_row(Row::from(vec!["UniqueID", "string_agg"]))
        );

        assert_eq!(
            input_stream.next().unwrap().unwrap(),
            Row::from(vec!["\u{e1}rbol", "RECEPCI\u{d3}N]2020-01-01 10:00:00.0+00"])
        );
    }

    #[test]
    fn test_encoding_from_label() {
        assert_eq!(encoding_from_label("latin1").unwrap().name(), "windows-1252");

        match encoding_from_label("klingon") {
            Err(Error::UnknownEncoding(label)) => assert_eq!(label, "klingon"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_denormalize_file() {
        let table = InputStream::from_path("test/assets/lifecycle.csv", UTF_8)
            .unwrap()
            .denormalize(&Columns::default())
            .unwrap()
            .project(None)
            .unwrap();

        assert_eq!(
            *table.headers(),
            Row::from(vec![
                "UniqueID",
                "REGISTERED_0",
                "INITIATED_0",
                "APPOINTMENT_SCHEDULED_0",
                "CLOSED_0",
                "ACKNOWLEDGED_0",
                "APPROVED_0",
                "ON_HOLD_0",
                "APPROVED_1",
            ])
        );
        assert_eq!(
            table.rows()[0],
            Row::from(vec![
                "15569264",
                "Aug 08 2019, 04:12:53",
                "Aug 09 2019, 05:20:06",
                "Aug 09 2019, 05:49:25",
                "Dec 13 2019, 08:08:35",
                "",
                "",
                "",
                "",
            ])
        );
    }

    #[test]
    fn test_malformed_file() {
        let result = InputStream::from_path("test/assets/malformed.csv", UTF_8)
            .unwrap()
            .denormalize(&Columns::default());

        match result {
            Err(Error::MalformedSegment { row, .. }) => assert_eq!(row, 1),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_bad_timestamp_file() {
        let result = InputStream::from_path("test/assets/bad_timestamp.csv", UTF_8)
            .unwrap()
            .denormalize(&Columns::default());

        match result {
            Err(Error::TimestampFormat { row, .. }) => assert_eq!(row, 0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_short_row_is_missing_a_column() {
        let result = InputStream::from_path("test/assets/ragged.csv", UTF_8)
            .unwrap()
            .denormalize(&Columns::default());

        match result {
            Err(Error::MissingColumn { column, row }) => {
                assert_eq!(column, "string_agg");
                assert_eq!(row, 1);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let table = InputStream::from_path("test/assets/long_row.csv", UTF_8)
            .unwrap()
            .denormalize(&Columns::default())
            .unwrap()
            .project(None)
            .unwrap();

        assert_eq!(*table.headers(), Row::from(vec!["UniqueID", "A_0"]));
        assert_eq!(
            table.rows(),
            &[
                Row::from(vec!["1", "Jan 01 2020, 10:00:00"]),
                Row::from(vec!["2", "Jan 02 2020, 11:00:00"]),
            ]
        );
    }

    #[test]
    fn test_invalid_bytes_are_reported() {
        let mut input_stream =
            InputStream::from_path("test/assets/invalid_utf8.csv", UTF_8).unwrap();

        assert!(input_stream.next().unwrap().is_ok());

        match input_stream.next() {
            Some(Err(Error::Decode(_))) => {}
            _ => unreachable!(),
        }
    }
}
