use chrono::{DateTime, FixedOffset, ParseError};
use thiserror::Error;

/// Appended to every raw value before parsing. Completes the `+HH` offsets
/// written by PostgreSQL into `+HH:MM`.
pub const SUFFIX: &str = ":00";

/// Rendering used for every timestamp in the output.
pub const OUTPUT_FORMAT: &str = "%b %d %Y, %H:%M:%S";

/// Accepted number of digits after the seconds.
const FRACTION_DIGITS: std::ops::RangeInclusive<usize> = 1..=6;

// The last two accept an offset already written as `+HHMM`, in which case
// the suffix is left over after it.
const INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z:00",
    "%Y-%m-%dT%H:%M:%S%.f%z:00",
];

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimestampError {
    #[error("expected a fraction of 1 to 6 digits after the seconds")]
    Fraction,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Counts the digits following the `.` of the seconds. A successful chrono
/// parse guarantees the only `.` is that one.
fn fraction_digits(raw: &str) -> usize {
    match raw.find('.') {
        Some(dot) => raw[dot + 1..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count(),
        None => 0,
    }
}

/// Parses a raw compound field value after appending [`SUFFIX`].
pub fn parse(raw: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    let value = format!("{}{}", raw, SUFFIX);

    // on failure report the format matching the date/time separator
    let closest = if raw.as_bytes().get(10) == Some(&b'T') {
        INPUT_FORMATS[1]
    } else {
        INPUT_FORMATS[0]
    };

    let parsed = INPUT_FORMATS
        .iter()
        .map(|format| DateTime::parse_from_str(&value, format))
        .find(Result::is_ok)
        .unwrap_or_else(|| DateTime::parse_from_str(&value, closest))?;

    if !FRACTION_DIGITS.contains(&fraction_digits(raw)) {
        return Err(TimestampError::Fraction);
    }

    Ok(parsed)
}

/// Renders the wall clock time of `timestamp` in its own offset, dropping
/// the fraction and the zone.
pub fn render(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format(OUTPUT_FORMAT).to_string()
}

/// Parses and renders in one go.
pub fn normalize(raw: &str) -> Result<String, TimestampError> {
    parse(raw).map(|t| render(&t))
}

#[cfg(test)]
mod tests {
    use super::{normalize, parse, TimestampError, INPUT_FORMATS};
    use chrono::DateTime;

    #[test]
    fn test_postgres_offset() {
        assert_eq!(
            normalize("2019-08-08 04:12:53.123456+00").unwrap(),
            "Aug 08 2019, 04:12:53"
        );
    }

    #[test]
    fn test_t_separator_and_four_digit_offset() {
        assert_eq!(
            normalize("2019-05-01T13:48:28.0+0000").unwrap(),
            "May 01 2019, 13:48:28"
        );
    }

    #[test]
    fn test_keeps_local_wall_time() {
        assert_eq!(
            normalize("2020-02-16 23:45:09.5-05").unwrap(),
            "Feb 16 2020, 23:45:09"
        );
    }

    #[test]
    fn test_every_month_abbreviation() {
        let months = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun",
            "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        for (i, month) in months.iter().enumerate() {
            let raw = format!("2021-{:02}-03 01:02:03.4+00", i + 1);

            assert_eq!(
                normalize(&raw).unwrap(),
                format!("{} 03 2021, 01:02:03", month)
            );
        }
    }

    #[test]
    fn test_wrong_format() {
        assert!(normalize("08/08/2019 04:12:53").is_err());
        assert!(normalize("2019-08-08 04:12:53.1").is_err());
        assert!(normalize("").is_err());
    }

    #[test]
    fn test_out_of_range_date() {
        assert!(normalize("2019-02-30 04:12:53.1+00").is_err());
    }

    #[test]
    fn test_missing_fraction_fails() {
        assert_eq!(
            normalize("2019-05-01 13:48:28+00"),
            Err(TimestampError::Fraction)
        );
        assert!(normalize("2019-05-01 13:48:28.+00").is_err());
    }

    #[test]
    fn test_too_many_fraction_digits_fails() {
        assert_eq!(
            normalize("2019-05-01 13:48:28.123456789+00"),
            Err(TimestampError::Fraction)
        );
        assert_eq!(
            normalize("2019-05-01 13:48:28.1234567+00"),
            Err(TimestampError::Fraction)
        );
    }

    #[test]
    fn test_six_fraction_digits() {
        assert_eq!(
            normalize("2019-05-01T13:48:28.123456+0000").unwrap(),
            "May 01 2019, 13:48:28"
        );
    }

    #[test]
    fn test_error_comes_from_matching_separator() {
        let raw = "2019-05-01 13:48";
        let expected =
            DateTime::parse_from_str(&format!("{}:00", raw), INPUT_FORMATS[0]).unwrap_err();

        assert_eq!(parse(raw).unwrap_err(), TimestampError::Parse(expected));

        let raw = "2019-05-01T13:48";
        let expected =
            DateTime::parse_from_str(&format!("{}:00", raw), INPUT_FORMATS[1]).unwrap_err();

        assert_eq!(parse(raw).unwrap_err(), TimestampError::Parse(expected));
    }
}
