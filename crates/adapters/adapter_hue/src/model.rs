//! Wire model of the Hue v1 REST API.
//!
//! Collections are JSON objects keyed by the bridge id. Only the fields the
//! adapter reads are modelled; everything else is ignored.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use hometick_domain::time::Timestamp;
use serde::Deserialize;
use serde_json::Value;

use crate::error::HueError;

/// Bridge timestamps are UTC without an offset.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// `lastupdated` value of a sensor that never reported.
const NEVER_UPDATED: &str = "none";
const MOTION_SENSOR_PRODUCT: &str = "Hue motion sensor";
const PRESENCE_SENSOR_TYPE: &str = "ZLLPresence";

pub(crate) type Collection<T> = BTreeMap<String, T>;

pub(crate) trait Named {
    fn name(&self) -> &str;
}

/// Find an item by name, returning its bridge id as well.
pub(crate) fn find_by_name<'a, T: Named>(
    items: &'a Collection<T>,
    name: &str,
) -> Option<(&'a str, &'a T)> {
    items
        .iter()
        .find(|(_, item)| item.name() == name)
        .map(|(id, item)| (id.as_str(), item))
}

#[derive(Debug, Deserialize)]
pub(crate) struct Sensor {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub productname: Option<String>,
    #[serde(default)]
    pub state: SensorState,
}

impl Sensor {
    pub fn is_motion_sensor(&self) -> bool {
        self.productname.as_deref() == Some(MOTION_SENSOR_PRODUCT)
            || self.kind == PRESENCE_SENSOR_TYPE
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SensorState {
    #[serde(default)]
    pub lastupdated: Option<String>,
    #[serde(default)]
    pub buttonevent: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Group {
    pub name: String,
    #[serde(default)]
    pub state: GroupState,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GroupState {
    #[serde(default)]
    pub any_on: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Scene {
    pub name: String,
    /// Owning group id; only set for group scenes.
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Light {
    pub name: String,
    pub state: LightState,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LightState {
    pub on: bool,
    /// Absent on lights that cannot dim.
    #[serde(default)]
    pub bri: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceLink {
    pub name: String,
    #[serde(default)]
    pub links: Vec<String>,
}

impl ResourceLink {
    /// Ids of the groups this link points at (`/groups/<id>`).
    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.links
            .iter()
            .filter_map(|link| link.strip_prefix("/groups/"))
    }
}

/// The bridge names the resource link of motion sensor `3` `"MotionSensor 3"`.
pub(crate) fn motion_link_name(sensor_id: &str) -> String {
    format!("MotionSensor {sensor_id}")
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named!(Sensor, Group, Scene, Light, ResourceLink);

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    kind: i64,
    description: String,
}

/// The bridge reports failures as `[{"error": {...}}]` with HTTP 200.
pub(crate) fn check_errors(value: &Value) -> Result<(), HueError> {
    let Some(items) = value.as_array() else {
        return Ok(());
    };
    for item in items {
        if let Some(error) = item.get("error") {
            let error: ApiError = serde_json::from_value(error.clone()).map_err(HueError::Decode)?;
            return Err(HueError::Api {
                kind: error.kind,
                description: error.description,
            });
        }
    }
    Ok(())
}

/// Parse a sensor's `lastupdated` field.
pub(crate) fn parse_last_updated(raw: Option<&str>) -> Result<Option<Timestamp>, HueError> {
    match raw {
        None | Some(NEVER_UPDATED) => Ok(None),
        Some(raw) => NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map(|naive| Some(naive.and_utc()))
            .map_err(|_| HueError::InvalidTimestamp(raw.to_string())),
    }
}
