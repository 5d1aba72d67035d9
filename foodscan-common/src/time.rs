//! Timestamp utilities

use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an RFC 3339 timestamp (a trailing `Z` or explicit offset) into UTC.
///
/// Naive timestamps without an offset (`2025-01-01T10:00:00`) are read as UTC,
/// since upstream collection runs record local ISO strings without a zone.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::InvalidInput(format!("Invalid timestamp '{}': {}", input, e)))
}

/// Fractional hours elapsed from `earlier` to `later` (negative if `later` precedes it)
pub fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_parse_rfc3339_with_z() {
        let ts = parse_timestamp("2025-03-01T12:00:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset_converts_to_utc() {
        let ts = parse_timestamp("2025-03-01T14:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        let ts = parse_timestamp("2025-03-01T12:00:00.250").unwrap();
        assert_eq!(ts.timestamp(), Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap().timestamp());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(parse_timestamp("yesterday"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_hours_between() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(hours_between(start, start + Duration::hours(73)), 73.0);
        assert_eq!(hours_between(start, start + Duration::minutes(90)), 1.5);
        assert!(hours_between(start + Duration::hours(1), start) < 0.0);
    }
}
