//! Display formatting for timestamps shown to operators.
//!
//! Inputs come from the database or from user-supplied strings, so every
//! helper tolerates bad input instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%-d %b, %Y";
const DATE_TIME_FORMAT: &str = "%-d %b, %Y, %-I:%M %p";

/// Parse RFC 3339, `SQLite` `YYYY-MM-DD HH:MM:SS`, ISO without offset, or a bare date.
///
/// Offsets are kept as written: the result is the wall-clock time of the input.
fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a timestamp as `D Mon, YYYY` (e.g. `5 Mar, 2024`).
///
/// Returns an empty string when the input cannot be parsed.
#[must_use]
pub fn format_iso_date(input: &str) -> String {
    parse_timestamp(input).map_or_else(String::new, |dt| dt.format(DATE_FORMAT).to_string())
}

/// Format a timestamp as `D Mon, YYYY, H:MM AM/PM`.
///
/// Returns the input unchanged when it cannot be parsed.
#[must_use]
pub fn format_date_time(input: &str) -> String {
    parse_timestamp(input).map_or_else(
        || input.to_string(),
        |dt| dt.format(DATE_TIME_FORMAT).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn iso_date_from_rfc3339() {
        assert_eq!(format_iso_date("2024-03-05T14:30:00Z"), "5 Mar, 2024");
    }

    #[test]
    fn iso_date_keeps_written_offset() {
        assert_eq!(format_iso_date("2024-03-05T23:30:00-05:00"), "5 Mar, 2024");
    }

    #[test]
    fn iso_date_from_sqlite_and_bare_date() {
        assert_eq!(format_iso_date("2023-11-20 08:00:00"), "20 Nov, 2023");
        assert_eq!(format_iso_date("2024-12-25"), "25 Dec, 2024");
    }

    #[test]
    fn iso_date_invalid_is_empty() {
        assert_eq!(format_iso_date("not a date"), "");
        assert_eq!(format_iso_date("2024-13-01"), "");
        assert_eq!(format_iso_date(""), "");
    }

    #[test]
    fn date_time_formats_twelve_hour_clock() {
        assert_eq!(
            format_date_time("2024-03-05T14:30:00Z"),
            "5 Mar, 2024, 2:30 PM"
        );
        assert_eq!(format_date_time("2024-12-25"), "25 Dec, 2024, 12:00 AM");
        assert_eq!(
            format_date_time("2024-07-01T09:05:12.345"),
            "1 Jul, 2024, 9:05 AM"
        );
    }

    #[test]
    fn date_time_invalid_returns_original() {
        assert_eq!(format_date_time("yesterday"), "yesterday");
        assert_eq!(format_date_time(""), "");
    }
}
