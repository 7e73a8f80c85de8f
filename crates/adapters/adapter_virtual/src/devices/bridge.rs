//! Virtual lighting bridge.

use std::collections::BTreeMap;

use hometick_app::ports::{LightingBridge, MotionLink};
use hometick_domain::error::HubError;
use hometick_domain::power::PowerState;
use hometick_domain::sensor::{LightReading, SensorReading};
use hometick_domain::time::{Timestamp, now};

use super::Shared;

#[derive(Default)]
struct BridgeState {
    groups: BTreeMap<String, bool>,
    lights: BTreeMap<String, LightReading>,
    sensors: BTreeMap<String, SensorReading>,
    links: Vec<MotionLink>,
    /// Recalled scenes as `"<group> <scene>"`.
    scenes: Vec<String>,
}

/// A lighting bridge where every group, light and sensor exists: names seen
/// for the first time start off and never updated.
#[derive(Clone, Default)]
pub struct VirtualBridge {
    state: Shared<BridgeState>,
}

impl VirtualBridge {
    /// Report `sensor` as controlling `group` during discovery.
    #[must_use]
    pub fn with_motion_link(self, sensor: impl Into<String>, group: impl Into<String>) -> Self {
        self.state.lock().links.push(MotionLink {
            sensor: sensor.into(),
            group: group.into(),
        });
        self
    }

    /// Record a button press on `sensor` at `at`.
    pub fn press_button_at(&self, sensor: &str, button: i64, at: Timestamp) {
        self.state.lock().sensors.insert(
            sensor.to_string(),
            SensorReading {
                name: sensor.to_string(),
                last_updated: Some(at),
                button_event: Some(button),
            },
        );
    }

    /// Record a button press on `sensor` now.
    pub fn press_button(&self, sensor: &str, button: i64) {
        self.press_button_at(sensor, button, now());
    }

    /// Record motion on `sensor` at `at`.
    pub fn motion_at(&self, sensor: &str, at: Timestamp) {
        self.state.lock().sensors.insert(
            sensor.to_string(),
            SensorReading {
                name: sensor.to_string(),
                last_updated: Some(at),
                button_event: None,
            },
        );
    }

    pub fn set_light(&self, name: &str, on: bool, brightness: u8) {
        self.state
            .lock()
            .lights
            .insert(name.to_string(), LightReading { on, brightness });
    }

    pub fn set_group(&self, name: &str, on: bool) {
        self.state.lock().groups.insert(name.to_string(), on);
    }

    #[must_use]
    pub fn group(&self, name: &str) -> bool {
        self.state.lock().groups.get(name).copied().unwrap_or(false)
    }

    /// Recalled scenes, oldest first, as `"<group> <scene>"`.
    #[must_use]
    pub fn scenes(&self) -> Vec<String> {
        self.state.lock().scenes.clone()
    }
}

impl LightingBridge for VirtualBridge {
    async fn sensor(&self, name: &str) -> Result<SensorReading, HubError> {
        let reading = self.state.lock().sensors.get(name).cloned();
        Ok(reading.unwrap_or_else(|| SensorReading {
            name: name.to_string(),
            last_updated: None,
            button_event: None,
        }))
    }

    async fn group_is_on(&self, group: &str) -> Result<bool, HubError> {
        Ok(self.group(group))
    }

    async fn set_group_power(&self, group: &str, power: PowerState) -> Result<(), HubError> {
        tracing::info!(group, %power, "virtual group switched");
        self.set_group(group, power.is_on());
        Ok(())
    }

    async fn run_scene(&self, group: &str, scene: &str) -> Result<(), HubError> {
        tracing::info!(group, scene, "virtual scene recalled");
        let mut state = self.state.lock();
        state.groups.insert(group.to_string(), true);
        state.scenes.push(format!("{group} {scene}"));
        Ok(())
    }

    async fn light(&self, name: &str) -> Result<LightReading, HubError> {
        let reading = self.state.lock().lights.get(name).copied();
        Ok(reading.unwrap_or(LightReading {
            on: false,
            brightness: 0,
        }))
    }

    async fn motion_links(&self) -> Result<Vec<MotionLink>, HubError> {
        Ok(self.state.lock().links.clone())
    }
}
