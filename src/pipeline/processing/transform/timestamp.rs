//! Order timestamp parsing.
//!
//! Exports arrive with a handful of hand-typed layouts. Rather than guessing,
//! every accepted layout is listed here and tried in order:
//!
//! | layout                                  | example                    |
//! |-----------------------------------------|----------------------------|
//! | `YYYY-MM-DDTHH:MM[:SS[.fff]]`           | `2025-10-19T08:00:00`      |
//! | `YYYY-MM-DD HH:MM[:SS[.fff]]`           | `2025-10-19 08:05`         |
//! | `YYYY/MM/DDTHH:MM[:SS]`                 | `2025/10/19T08:25`         |
//! | `YYYY/MM/DD HH:MM[:SS]`                 | `2025/10/19 08:25:10`      |
//! | `DD/MM/YYYY HH:MM[:SS] AM\|PM`          | `19/10/2025 08:10 AM`      |
//! | `DD/MM/YYYY HH:MM[:SS]`                 | `19/10/2025 20:10`         |
//! | `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY` | `2025-10-19` (midnight)   |
//!
//! Any layout with a time may end in `Z` (UTC) or a `+HH:MM` / `-HHMM`
//! offset. Output is `YYYY-MM-DDTHH:MM:SS`, with `+HH:MM` appended when the
//! input carried a zone. Fractional seconds are dropped.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%dT%H:%M:%S",
    "%Y/%m/%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

const NAIVE_OUTPUT: &str = "%Y-%m-%dT%H:%M:%S";
const ZONED_OUTPUT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// A numeric offset directly after a clock time, e.g. `08:00:00-05:00`
static OFFSET_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*[0-9]:[0-9]{2}(?::[0-9]{2}(?:\.[0-9]+)?)?)\s*([+-])([0-9]{2}):?([0-9]{2})$")
        .expect("offset pattern is valid")
});

/// Why a timestamp could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// No accepted layout matched
    UnknownFormat,
    /// The zone offset is outside ±23:59
    InvalidOffset,
}

/// Parse a raw timestamp into ISO-8601.
///
/// Non-strings and empty strings give `Ok("")`. A string that matches no
/// accepted layout is an error, so callers can report it; the record itself
/// keeps an empty timestamp either way.
pub fn parse_timestamp(value: &Value) -> Result<String, TimestampError> {
    let Some(text) = value.as_str() else {
        return Ok(String::new());
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(String::new());
    }

    let (body, offset) = split_offset(text)?;
    let naive = parse_naive(body).ok_or(TimestampError::UnknownFormat)?;

    match offset {
        None => Ok(naive.format(NAIVE_OUTPUT).to_string()),
        Some(offset) => {
            let zoned = offset
                .from_local_datetime(&naive)
                .single()
                .ok_or(TimestampError::UnknownFormat)?;
            Ok(zoned.format(ZONED_OUTPUT).to_string())
        }
    }
}

/// Separate a trailing `Z` or numeric offset from the rest of the timestamp.
fn split_offset(text: &str) -> Result<(&str, Option<FixedOffset>), TimestampError> {
    if let Some(body) = text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        return Ok((body.trim_end(), FixedOffset::east_opt(0)));
    }

    let Some(caps) = OFFSET_SUFFIX.captures(text) else {
        return Ok((text, None));
    };

    let body = caps.get(1).map_or(text, |m| m.as_str());
    let hours: i32 = caps[3].parse().map_err(|_| TimestampError::InvalidOffset)?;
    let minutes: i32 = caps[4].parse().map_err(|_| TimestampError::InvalidOffset)?;
    if minutes >= 60 {
        return Err(TimestampError::InvalidOffset);
    }
    let mut seconds = hours * 3600 + minutes * 60;
    if &caps[2] == "-" {
        seconds = -seconds;
    }

    let offset = FixedOffset::east_opt(seconds).ok_or(TimestampError::InvalidOffset)?;
    Ok((body, Some(offset)))
}

fn parse_naive(body: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(body, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(body, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(s: &str) -> String {
        parse_timestamp(&json!(s)).unwrap()
    }

    #[test]
    fn test_iso_with_zulu() {
        assert_eq!(parse("2025-10-19T08:00:00Z"), "2025-10-19T08:00:00+00:00");
        assert_eq!(parse("2025-10-19T08:00:00z"), "2025-10-19T08:00:00+00:00");
    }

    #[test]
    fn test_iso_with_offsets() {
        assert_eq!(parse("2025-10-19T08:00:00+05:30"), "2025-10-19T08:00:00+05:30");
        assert_eq!(parse("2025-10-19T08:00:00-0500"), "2025-10-19T08:00:00-05:00");
        assert_eq!(parse("2025-10-19 08:00 +01:00"), "2025-10-19T08:00:00+01:00");
    }

    #[test]
    fn test_iso_without_zone() {
        assert_eq!(parse("2025-10-19T08:45:00"), "2025-10-19T08:45:00");
        assert_eq!(parse("2025-10-19T08:45"), "2025-10-19T08:45:00");
    }

    #[test]
    fn test_fractional_seconds_are_dropped() {
        assert_eq!(parse("2025-10-19T08:00:00.123456"), "2025-10-19T08:00:00");
        assert_eq!(parse("2025-10-19T08:00:00.5Z"), "2025-10-19T08:00:00+00:00");
        assert_eq!(parse("2025-10-19 08:00:00.250"), "2025-10-19T08:00:00");
    }

    #[test]
    fn test_space_separated() {
        assert_eq!(parse("2025-10-19 08:05"), "2025-10-19T08:05:00");
        assert_eq!(parse("2025-10-19 08:05:30"), "2025-10-19T08:05:30");
    }

    #[test]
    fn test_day_first_with_meridiem() {
        assert_eq!(parse("19/10/2025 08:10 AM"), "2025-10-19T08:10:00");
        assert_eq!(parse("19/10/2025 08:10 PM"), "2025-10-19T20:10:00");
        assert_eq!(parse("19/10/2025 12:00 am"), "2025-10-19T00:00:00");
        assert_eq!(parse("05/10/2025 08:10:15 PM"), "2025-10-05T20:10:15");
        assert_eq!(parse("19/10/2025 20:10"), "2025-10-19T20:10:00");
    }

    #[test]
    fn test_slashed_year_first_with_zulu() {
        assert_eq!(parse("2025/10/19T08:25Z"), "2025-10-19T08:25:00+00:00");
        assert_eq!(parse("2025/10/19 08:25:10"), "2025-10-19T08:25:10");
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(parse("2025-10-19"), "2025-10-19T00:00:00");
        assert_eq!(parse("2025/10/19"), "2025-10-19T00:00:00");
        assert_eq!(parse("19/10/2025"), "2025-10-19T00:00:00");
    }

    #[test]
    fn test_date_only_is_not_mistaken_for_offset() {
        // "-19" at the end of a bare date is the day, not a zone
        assert_eq!(parse("2025-10-19"), "2025-10-19T00:00:00");
    }

    #[test]
    fn test_blank_and_non_string_give_empty() {
        assert_eq!(parse_timestamp(&json!("")), Ok(String::new()));
        assert_eq!(parse_timestamp(&json!("   ")), Ok(String::new()));
        assert_eq!(parse_timestamp(&json!(null)), Ok(String::new()));
        assert_eq!(parse_timestamp(&json!(1729324800)), Ok(String::new()));
    }

    #[test]
    fn test_unparseable_is_an_error() {
        assert_eq!(parse_timestamp(&json!("...")), Err(TimestampError::UnknownFormat));
        assert_eq!(parse_timestamp(&json!("yesterday")), Err(TimestampError::UnknownFormat));
        assert_eq!(parse_timestamp(&json!("2025-13-40T08:00:00")), Err(TimestampError::UnknownFormat));
        assert_eq!(parse_timestamp(&json!("19/10/2025 13:10 PM")), Err(TimestampError::UnknownFormat));
    }

    #[test]
    fn test_out_of_range_offset() {
        assert_eq!(
            parse_timestamp(&json!("2025-10-19T08:00:00+25:00")),
            Err(TimestampError::InvalidOffset)
        );
    }

    #[test]
    fn test_output_reparses_to_itself() {
        for input in ["2025-10-19T08:00:00Z", "2025-10-19 08:05", "19/10/2025 08:10 PM"] {
            let once = parse(input);
            assert_eq!(parse(&once), once);
        }
    }
}
