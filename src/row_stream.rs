use crate::{
    config::Columns,
    denormalize::{self, Scan},
    error::{Result, RowResult},
    Headers, Row,
};

/// This trait describes the behaviour of every source of rows that can be
/// fed to the denormalizer: something that knows its headers and can be
/// turned into an iterator of rows.
///
/// Implement this trait to denormalize rows coming from your own sources.
pub trait RowStream: IntoIterator<Item = RowResult> {
    /// Must return the headers of the rows yielded by this stream.
    fn headers(&self) -> &Headers;

    /// Consumes the whole stream parsing the compound column of every row.
    /// Stops at the first error.
    fn denormalize(self, columns: &Columns) -> Result<Scan>
    where
        Self: Sized,
    {
        let headers = self.headers().clone();

        denormalize::scan(&headers, self, columns)
    }
}

/// Gets the value of the column named `field` from `row`.
pub fn get_field<'r>(headers: &Headers, row: &'r Row, field: &str) -> Option<&'r str> {
    headers.get(field).and_then(|index| row.get(index))
}
