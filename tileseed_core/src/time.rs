//! Epoch-timestamp helpers for refresh and removal thresholds.
//!
//! Thresholds are plain unix timestamps (seconds, UTC). Absolute
//! timestamps parse from RFC 3339 or ISO 8601 strings; strings without a
//! UTC offset are interpreted as UTC.

use anyhow::{Context, Result, anyhow};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

/// The current unix timestamp.
#[must_use]
pub fn now() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}

/// Parses an ISO 8601 timestamp like `2011-05-12T12:00:00` into a unix
/// timestamp. A trailing UTC offset (`Z`, `+02:00`) is honored; without
/// one the timestamp counts as UTC.
pub fn parse_timestamp(text: &str) -> Result<i64> {
	if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
		return Ok(timestamp.unix_timestamp());
	}
	let timestamp = PrimitiveDateTime::parse(text, &Iso8601::DEFAULT)
		.with_context(|| format!("'{text}' is not an ISO 8601 timestamp"))?;
	Ok(timestamp.assume_utc().unix_timestamp())
}

/// The unix timestamp that lies the given spans before the current time.
#[must_use]
pub fn timestamp_before(weeks: u32, days: u32, hours: u32, minutes: u32) -> i64 {
	let delta = Duration::weeks(i64::from(weeks))
		+ Duration::days(i64::from(days))
		+ Duration::hours(i64::from(hours))
		+ Duration::minutes(i64::from(minutes));
	(OffsetDateTime::now_utc() - delta).unix_timestamp()
}

/// Formats a unix timestamp as an RFC 3339 string for display.
pub fn format_timestamp(timestamp: i64) -> Result<String> {
	let datetime = OffsetDateTime::from_unix_timestamp(timestamp)
		.map_err(|e| anyhow!("timestamp {timestamp} is out of range: {e}"))?;
	datetime
		.format(&Rfc3339)
		.map_err(|e| anyhow!("cannot format timestamp {timestamp}: {e}"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use time::macros::datetime;

	#[rstest]
	#[case("2011-05-12T12:00:00", datetime!(2011-05-12 12:00 UTC))]
	#[case("2011-05-12T12:00:00Z", datetime!(2011-05-12 12:00 UTC))]
	#[case("2011-05-12T12:00:00+02:00", datetime!(2011-05-12 10:00 UTC))]
	#[case("1970-01-01T00:00:00", datetime!(1970-01-01 00:00 UTC))]
	fn test_parse_timestamp(#[case] text: &str, #[case] expected: OffsetDateTime) {
		assert_eq!(parse_timestamp(text).unwrap(), expected.unix_timestamp());
	}

	#[rstest]
	#[case("2011-05-12")]
	#[case("12:00:00")]
	#[case("last tuesday")]
	#[case("")]
	fn test_parse_timestamp_invalid(#[case] text: &str) {
		let error = parse_timestamp(text).unwrap_err();
		assert!(error.to_string().contains("is not an ISO 8601 timestamp"));
	}

	#[test]
	fn test_timestamp_before() {
		let expected = now() - 2 * 604_800 - 3 * 86_400 - 4 * 3_600 - 5 * 60;
		let actual = timestamp_before(2, 3, 4, 5);
		// allow for the clock ticking between the two calls
		assert!((actual - expected).abs() <= 1);
	}

	#[test]
	fn test_format_timestamp() {
		assert_eq!(format_timestamp(1_305_201_600).unwrap(), "2011-05-12T12:00:00Z");
		assert!(format_timestamp(i64::MAX).is_err());
	}
}
