//! Parsing of the compound field: `key]value|key]value|...`

pub const SEGMENT_SEPARATOR: char = '|';
pub const KEY_SEPARATOR: char = ']';

/// One `key]value` piece of a compound field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> Segment<'a> {
    /// Splits on the first `]`. Returns `None` when there is no separator.
    pub fn parse(segment: &'a str) -> Option<Segment<'a>> {
        segment
            .split_once(KEY_SEPARATOR)
            .map(|(key, value)| Segment { key, value })
    }
}

/// Iterates over the segments of a compound field. Each item is either the
/// parsed segment or the raw text of a segment lacking its separator.
pub fn segments(field: &str) -> impl Iterator<Item = Result<Segment<'_>, &str>> {
    field
        .split(SEGMENT_SEPARATOR)
        .map(|raw| Segment::parse(raw).ok_or(raw))
}
