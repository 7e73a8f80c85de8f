//! Lighting bridge port: sensors, light groups, scenes and single lights.

use std::future::Future;

use hometick_domain::error::HubError;
use hometick_domain::power::PowerState;
use hometick_domain::sensor::{LightReading, SensorReading};

/// A motion sensor the bridge links to a light group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionLink {
    pub sensor: String,
    pub group: String,
}

/// A smart-lighting bridge. Everything is addressed by its display name.
pub trait LightingBridge: Send + Sync {
    /// Current reading of a sensor.
    fn sensor(&self, name: &str) -> impl Future<Output = Result<SensorReading, HubError>> + Send;

    /// Whether any light of the group is on.
    fn group_is_on(&self, group: &str) -> impl Future<Output = Result<bool, HubError>> + Send;

    fn set_group_power(
        &self,
        group: &str,
        power: PowerState,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Recall a scene on a group.
    fn run_scene(
        &self,
        group: &str,
        scene: &str,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    fn light(&self, name: &str) -> impl Future<Output = Result<LightReading, HubError>> + Send;

    /// Motion sensors the bridge has linked to a light group.
    fn motion_links(&self) -> impl Future<Output = Result<Vec<MotionLink>, HubError>> + Send;
}
