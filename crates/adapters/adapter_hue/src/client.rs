//! HTTP client for the Hue bridge.

use hometick_app::ports::{LightingBridge, MotionLink};
use hometick_domain::error::HubError;
use hometick_domain::power::PowerState;
use hometick_domain::sensor::{LightReading, SensorReading};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::HueConfig;
use crate::error::HueError;
use crate::model::{
    Collection, Group, Light, ResourceLink, Scene, Sensor, check_errors, find_by_name,
    motion_link_name, parse_last_updated,
};

/// A Hue bridge reached over its local REST API.
pub struct HueBridge {
    http: reqwest::Client,
    /// `<base_url>/api/<username>`; contains the credential, never log it.
    api: String,
}

impl HueBridge {
    /// Build a client for the configured bridge. No request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`HueError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &HueConfig) -> Result<Self, HueError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        let api = format!(
            "{}/api/{}",
            config.base_url.trim_end_matches('/'),
            config.username.expose_secret()
        );
        Ok(Self { http, api })
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str) -> Result<T, HueError> {
        tracing::debug!(resource, "hue GET");
        let response = self
            .http
            .get(format!("{}/{resource}", self.api))
            .send()
            .await?;
        let value = read_body(response).await?;
        serde_json::from_value(value).map_err(HueError::Decode)
    }

    async fn put_group_action(&self, group_id: &str, body: Value) -> Result<(), HueError> {
        tracing::debug!(group_id, %body, "hue PUT group action");
        let response = self
            .http
            .put(format!("{}/groups/{group_id}/action", self.api))
            .json(&body)
            .send()
            .await?;
        read_body(response).await.map(|_| ())
    }

    async fn group_id(&self, name: &str) -> Result<String, HueError> {
        let groups: Collection<Group> = self.get("groups").await?;
        find_by_name(&groups, name)
            .map(|(id, _)| id.to_string())
            .ok_or_else(|| not_found("group", name))
    }

    async fn read_sensor(&self, name: &str) -> Result<SensorReading, HueError> {
        let sensors: Collection<Sensor> = self.get("sensors").await?;
        let (_, sensor) = find_by_name(&sensors, name).ok_or_else(|| not_found("sensor", name))?;
        Ok(SensorReading {
            name: sensor.name.clone(),
            last_updated: parse_last_updated(sensor.state.lastupdated.as_deref())?,
            button_event: sensor.state.buttonevent,
        })
    }

    async fn read_group(&self, name: &str) -> Result<bool, HueError> {
        let groups: Collection<Group> = self.get("groups").await?;
        let (_, group) = find_by_name(&groups, name).ok_or_else(|| not_found("group", name))?;
        Ok(group.state.any_on)
    }

    async fn switch_group(&self, name: &str, power: PowerState) -> Result<(), HueError> {
        let id = self.group_id(name).await?;
        self.put_group_action(&id, json!({ "on": power.is_on() }))
            .await?;
        tracing::info!(group = name, %power, "switched light group");
        Ok(())
    }

    async fn recall_scene(&self, group: &str, scene: &str) -> Result<(), HueError> {
        let group_id = self.group_id(group).await?;
        let scenes: Collection<Scene> = self.get("scenes").await?;
        // Prefer the scene stored for this group; light scenes have no group.
        let scene_id = scenes
            .iter()
            .filter(|(_, candidate)| candidate.name == scene)
            .max_by_key(|(_, candidate)| candidate.group.as_deref() == Some(group_id.as_str()))
            .map(|(id, _)| id.clone())
            .ok_or_else(|| not_found("scene", scene))?;
        self.put_group_action(&group_id, json!({ "scene": scene_id }))
            .await?;
        tracing::info!(group, scene, "recalled scene");
        Ok(())
    }

    async fn read_light(&self, name: &str) -> Result<LightReading, HueError> {
        let lights: Collection<Light> = self.get("lights").await?;
        let (_, light) = find_by_name(&lights, name).ok_or_else(|| not_found("light", name))?;
        Ok(LightReading {
            on: light.state.on,
            brightness: light.state.bri,
        })
    }

    /// Map each motion sensor to the groups its bridge rule switches, via
    /// the resource link the bridge creates for every motion sensor.
    async fn discover_motion_links(&self) -> Result<Vec<MotionLink>, HueError> {
        let sensors: Collection<Sensor> = self.get("sensors").await?;
        let resource_links: Collection<ResourceLink> = self.get("resourcelinks").await?;
        let groups: Collection<Group> = self.get("groups").await?;

        let mut links = Vec::new();
        for (sensor_id, sensor) in sensors.iter().filter(|(_, s)| s.is_motion_sensor()) {
            let Some((_, resource)) = find_by_name(&resource_links, &motion_link_name(sensor_id))
            else {
                tracing::debug!(sensor = %sensor.name, "motion sensor has no resource link");
                continue;
            };
            for group_id in resource.group_ids() {
                let Some(group) = groups.get(group_id) else {
                    continue;
                };
                tracing::info!(
                    sensor_id,
                    sensor = %sensor.name,
                    group_id,
                    group = %group.name,
                    "motion sensor controls group"
                );
                links.push(MotionLink {
                    sensor: sensor.name.clone(),
                    group: group.name.clone(),
                });
            }
        }
        Ok(links)
    }
}

async fn read_body(response: reqwest::Response) -> Result<Value, HueError> {
    let status = response.status();
    if !status.is_success() {
        return Err(HueError::Status(status));
    }
    let value: Value = response.json().await?;
    check_errors(&value)?;
    Ok(value)
}

fn not_found(kind: &'static str, name: &str) -> HueError {
    HueError::NotFound {
        kind,
        name: name.to_string(),
    }
}

impl LightingBridge for HueBridge {
    async fn sensor(&self, name: &str) -> Result<SensorReading, HubError> {
        Ok(self.read_sensor(name).await?)
    }

    async fn group_is_on(&self, group: &str) -> Result<bool, HubError> {
        Ok(self.read_group(group).await?)
    }

    async fn set_group_power(&self, group: &str, power: PowerState) -> Result<(), HubError> {
        Ok(self.switch_group(group, power).await?)
    }

    async fn run_scene(&self, group: &str, scene: &str) -> Result<(), HubError> {
        Ok(self.recall_scene(group, scene).await?)
    }

    async fn light(&self, name: &str) -> Result<LightReading, HubError> {
        Ok(self.read_light(name).await?)
    }

    async fn motion_links(&self) -> Result<Vec<MotionLink>, HubError> {
        Ok(self.discover_motion_links().await?)
    }
}
