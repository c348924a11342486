//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

/// UTC timestamp used for duty status changes, departures and stop ETAs.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whole minutes from `from` to `to`, truncated.
///
/// Returns `None` when `to` is earlier than `from` so callers can decide how
/// to treat clock skew.
#[must_use]
pub fn whole_minutes_between(from: Timestamp, to: Timestamp) -> Option<u32> {
    let delta = to.signed_duration_since(from);
    if delta < TimeDelta::zero() {
        return None;
    }
    Some(u32::try_from(delta.num_minutes()).unwrap_or(u32::MAX))
}

/// Shift a timestamp forward by a number of minutes.
#[must_use]
pub fn add_minutes(ts: Timestamp, minutes: u32) -> Timestamp {
    ts + TimeDelta::minutes(i64::from(minutes))
}
