//! Plug links: keep a smart plug in step with a bridge light.
//!
//! Used for lamps whose power is cut at the plug: when the linked light is
//! switched on bright enough the plug follows, and off again otherwise.

use serde::Deserialize;

use crate::power::PowerState;
use crate::sensor::LightReading;

const DEFAULT_MIN_BRIGHTNESS: u8 = 50;

fn default_min_brightness() -> u8 {
    DEFAULT_MIN_BRIGHTNESS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlugLink {
    pub plug: String,
    pub light: String,
    /// Brightness at or above which the light counts as "on".
    #[serde(default = "default_min_brightness")]
    pub min_brightness: u8,
}

impl PlugLink {
    pub fn new(plug: impl Into<String>, light: impl Into<String>) -> Self {
        Self {
            plug: plug.into(),
            light: light.into(),
            min_brightness: DEFAULT_MIN_BRIGHTNESS,
        }
    }

    /// Plug state implied by a light observation.
    #[must_use]
    pub fn desired(&self, reading: LightReading) -> PowerState {
        PowerState::from(reading.on && reading.brightness >= self.min_brightness)
    }
}
