//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for sensor updates and debounce marks.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Time elapsed between `since` and `now`.
///
/// A missing `since` (a sensor that never reported) counts as
/// [`chrono::TimeDelta::MAX`], i.e. older than any threshold.
#[must_use]
pub fn elapsed(since: Option<Timestamp>, now: Timestamp) -> chrono::TimeDelta {
    since.map_or(chrono::TimeDelta::MAX, |ts| now - ts)
}
