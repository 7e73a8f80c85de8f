//! Hub config snapshot: the remote hub's activity and device catalogue.
//!
//! A snapshot is immutable: a refresh replaces it wholesale.

use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityId, ActivityLabel};

/// A device known to the remote hub (TV, AV switch, amplifier, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubDevice {
    /// Vendor device id, used when sending commands.
    pub id: String,
    pub label: String,
}

/// One fetch of the hub configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    pub activities: Vec<Activity>,
    pub devices: Vec<HubDevice>,
}

impl HubConfig {
    #[must_use]
    pub fn new(activities: Vec<Activity>, devices: Vec<HubDevice>) -> Self {
        Self {
            activities,
            devices,
        }
    }

    /// Resolve an activity id to its label.
    #[must_use]
    pub fn activity_label(&self, id: &ActivityId) -> Option<&ActivityLabel> {
        self.activities
            .iter()
            .find(|activity| &activity.id == id)
            .map(|activity| &activity.label)
    }

    /// Find the id of the activity with the given label.
    #[must_use]
    pub fn activity_id(&self, label: &str) -> Option<&ActivityId> {
        self.activities
            .iter()
            .find(|activity| activity.label == label)
            .map(|activity| &activity.id)
    }

    /// Find the id of the device with the given label.
    #[must_use]
    pub fn device_id(&self, label: &str) -> Option<&str> {
        self.devices
            .iter()
            .find(|device| device.label == label)
            .map(|device| device.id.as_str())
    }
}
