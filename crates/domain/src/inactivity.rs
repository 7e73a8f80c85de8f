//! Inactivity rules: switch a light group off once its motion sensor has
//! been quiet for long enough.

use chrono::TimeDelta;
use serde::Deserialize;

use crate::time::{Timestamp, elapsed};

/// Motion sensor to light group binding with a quiet-time threshold.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InactivityRule {
    pub sensor: String,
    pub group: String,
    /// Quiet time after which the group is switched off, in seconds.
    pub timeout_secs: u64,
}

impl InactivityRule {
    pub fn new(sensor: impl Into<String>, group: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            sensor: sensor.into(),
            group: group.into(),
            timeout_secs,
        }
    }

    /// Timeouts beyond what [`TimeDelta`] can hold saturate to
    /// [`TimeDelta::MAX`].
    #[must_use]
    pub fn timeout(&self) -> TimeDelta {
        i64::try_from(self.timeout_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// Whether the sensor has been quiet for strictly longer than the
    /// threshold. A sensor that never reported is always expired.
    #[must_use]
    pub fn is_expired(&self, last_updated: Option<Timestamp>, now: Timestamp) -> bool {
        elapsed(last_updated, now) > self.timeout()
    }
}
