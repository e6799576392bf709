use super::PlanError;
use crate::config::BeforeParam;
use tileseed_core::time::{parse_timestamp, timestamp_before};

/// Resolves a `refresh_before`/`remove_before` parameter into a unix
/// timestamp. Spans count back from the moment this runs.
pub fn resolve_before(param: &BeforeParam) -> Result<i64, PlanError> {
	match param {
		BeforeParam::Time { time } => parse_timestamp(time).map_err(|_| PlanError::InvalidTimestamp {
			value: time.clone(),
		}),
		BeforeParam::Delta {
			weeks,
			days,
			hours,
			minutes,
		} => Ok(timestamp_before(*weeks, *days, *hours, *minutes)),
	}
}
