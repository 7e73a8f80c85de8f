//! Sensor and light observations reported by the lighting bridge.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A snapshot of a bridge sensor (button switch or motion sensor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    pub name: String,
    /// Last time the bridge saw the sensor change; `None` if it never did.
    pub last_updated: Option<Timestamp>,
    /// Last button code for switches; `None` for sensors without buttons.
    pub button_event: Option<i64>,
}

/// A debounced button press, ready to be mapped to actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPress {
    pub sensor: String,
    pub button: Option<i64>,
}

/// Observed state of a single bridge light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightReading {
    pub on: bool,
    /// Brightness 0–254 as reported by the bridge.
    pub brightness: u8,
}
