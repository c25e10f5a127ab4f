//! Time related utils.

use crate::{Error, Result};
use chrono::Utc;
use std::time::Duration;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into ISO 8601 with separators: "2022-03-13T07:20:04Z"
///
/// This is the layout the API expects for `expires` and `time_stamp`.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse time from ISO 8601 with separators.
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")
        .map(|t| t.and_utc())
        .map_err(|e| Error::unexpected(format!("parse {s} as iso8601 failed")).with_source(e))
}

/// Add a std duration to the given time.
pub fn add_duration(t: DateTime, d: Duration) -> Result<DateTime> {
    chrono::TimeDelta::from_std(d)
        .ok()
        .and_then(|d| t.checked_add_signed(d))
        .ok_or_else(|| Error::config_invalid(format!("duration {d:?} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse_iso8601() {
        let t = parse_iso8601("2022-03-13T07:20:04Z").unwrap();
        assert_eq!(format_iso8601(t), "2022-03-13T07:20:04Z");

        let later = add_duration(t, Duration::from_secs(60)).unwrap();
        assert_eq!(format_iso8601(later), "2022-03-13T07:21:04Z");
    }

    #[test]
    fn test_parse_iso8601_rejects_other_layouts() {
        assert!(parse_iso8601("20220313T072004Z").is_err());
    }
}
