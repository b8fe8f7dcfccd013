//! Relative time window resolution
//!
//! Catchpoint accepts naive `YYYY-MM-DDTHH:MM:SS` timestamps and interprets
//! them in the account's timezone. Callers may instead ask for a window
//! relative to now: `end = "now"` and `start = -N` (minutes before now).

use crate::error::{Error, Result};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Sentinel accepted as `endTime` for relative windows
pub const NOW: &str = "now";

/// Wire format for resolved timestamps
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Resolve a possibly relative `(startTime, endTime)` pair against the clock
pub fn resolve_window(
  start: Option<&str>,
  end: Option<&str>,
  tz: &str,
) -> Result<(Option<String>, Option<String>)> {
  resolve_window_at(start, end, tz, Utc::now())
}

/// Same as [`resolve_window`] with an explicit notion of "now"
///
/// Absent bounds and absolute windows pass through untouched. When `end` is
/// `"now"`, `start` must be a negative whole number of minutes.
pub fn resolve_window_at(
  start: Option<&str>,
  end: Option<&str>,
  tz: &str,
  now: DateTime<Utc>,
) -> Result<(Option<String>, Option<String>)> {
  let (start, end) = match (start, end) {
    (Some(start), Some(end)) if end == NOW => (start, end),
    _ => return Ok((start.map(str::to_string), end.map(str::to_string))),
  };
  debug!("Resolving relative window start={} end={} tz={}", start, end, tz);

  let offset_minutes = parse_offset(start)?;
  let zone: Tz = tz.parse().map_err(|_| Error::UnknownTimezone(tz.to_string()))?;

  // Offsets are applied on the wall clock so the printed pair is always
  // exactly N minutes apart, even across a DST change.
  let end_time = now.with_timezone(&zone).trunc_subsecs(0).naive_local();
  let start_time = TimeDelta::try_minutes(offset_minutes)
    .and_then(|delta| end_time.checked_add_signed(delta))
    .ok_or_else(|| Error::InvalidTimeWindow(format!("startTime {start} is out of range")))?;

  let start = start_time.format(TIME_FORMAT).to_string();
  let end = end_time.format(TIME_FORMAT).to_string();
  debug!("startTime: {}", start);
  debug!("endTime: {}", end);

  Ok((Some(start), Some(end)))
}

fn parse_offset(start: &str) -> Result<i64> {
  match start.trim().parse::<i64>() {
    Ok(minutes) if minutes < 0 => Ok(minutes),
    _ => Err(Error::InvalidTimeWindow(format!(
      "When using relative times, startTime must be a negative number \
       (number of minutes minus 'now'), got '{start}'"
    ))),
  }
}
