//! Frames of the Harmony local WebSocket API.

use hometick_domain::activity::{Activity, ActivityId};
use hometick_domain::hub_config::{HubConfig, HubDevice};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::HarmonyError;

const ENGINE: &str = "vnd.logitech.harmony/vnd.logitech.harmony.engine";
const CODE_PROGRESS: u64 = 100;
const CODE_OK: u64 = 200;
/// Server-side timeout, in seconds, the hub applies to each request.
const HUB_TIMEOUT: u64 = 30;

/// Activity id the hub uses for "everything off".
pub(crate) const POWER_OFF_ACTIVITY: &str = "-1";

/// Body of the HTTP provisioning request.
pub(crate) fn provision_request() -> Value {
    json!({
        "id": 1,
        "cmd": "setup.account?getProvisionInfo",
        "params": {}
    })
}

/// Extract the remote id from a provisioning reply.
pub(crate) fn parse_remote_id(body: &Value) -> Result<String, HarmonyError> {
    id_string(&body["data"]["activeRemoteId"]).ok_or(HarmonyError::MissingField("activeRemoteId"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ButtonStatus {
    Press,
    Release,
}

impl ButtonStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Press => "press",
            Self::Release => "release",
        }
    }
}

/// A request the adapter sends to the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Request<'a> {
    CurrentActivity,
    Config,
    StartActivity(&'a str),
    HoldAction {
        device_id: &'a str,
        command: &'a str,
        status: ButtonStatus,
    },
}

impl Request<'_> {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CurrentActivity => "getCurrentActivity",
            Self::Config => "config",
            Self::StartActivity(_) => "runactivity",
            Self::HoldAction { .. } => "holdAction",
        }
    }

    fn command(&self) -> String {
        match self {
            Self::StartActivity(_) => "harmony.activityengine?runactivity".to_string(),
            other => format!("{ENGINE}?{}", other.name()),
        }
    }

    fn params(&self) -> Value {
        match self {
            Self::CurrentActivity | Self::Config => json!({ "verb": "get" }),
            Self::StartActivity(id) => json!({
                "async": "true",
                "timestamp": 0,
                "args": { "rule": "start" },
                "activityId": id,
            }),
            Self::HoldAction {
                device_id,
                command,
                status,
            } => {
                let action = json!({
                    "command": command,
                    "type": "IRCommand",
                    "deviceId": device_id,
                });
                json!({
                    "status": status.as_str(),
                    "timestamp": "0",
                    "verb": "render",
                    "action": action.to_string(),
                })
            }
        }
    }

    /// Button events are fire-and-forget.
    pub fn expects_reply(&self) -> bool {
        !matches!(self, Self::HoldAction { .. })
    }

    /// Serialize as a WebSocket text frame.
    pub fn frame(&self, remote_id: &str, request_id: &str) -> String {
        json!({
            "hubId": remote_id,
            "timeout": HUB_TIMEOUT,
            "hbus": {
                "cmd": self.command(),
                "id": request_id,
                "params": self.params(),
            }
        })
        .to_string()
    }
}

/// How an incoming frame relates to the pending request.
#[derive(Debug, PartialEq)]
pub(crate) enum Reply {
    /// A notification or a reply to another request.
    Unrelated,
    /// The request is still running.
    Progress,
    /// The request succeeded; carries the `data` member.
    Done(Value),
}

#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Classify a text frame received while `request` (with `request_id`) is pending.
pub(crate) fn parse_reply(
    text: &str,
    request: &Request<'_>,
    request_id: &str,
) -> Result<Reply, HarmonyError> {
    let frame: Frame = serde_json::from_str(text).map_err(HarmonyError::Decode)?;
    if frame.id.as_ref().and_then(id_string).as_deref() != Some(request_id) {
        return Ok(Reply::Unrelated);
    }
    let code = frame
        .code
        .as_ref()
        .and_then(code_number)
        .ok_or(HarmonyError::MissingField("code"))?;
    match code {
        CODE_OK => Ok(Reply::Done(frame.data)),
        CODE_PROGRESS => Ok(Reply::Progress),
        code => Err(HarmonyError::Rejected {
            command: request.name(),
            code,
            msg: frame.msg.unwrap_or_default(),
        }),
    }
}

/// Extract the current activity id from a `getCurrentActivity` reply.
pub(crate) fn parse_current_activity(data: &Value) -> Result<ActivityId, HarmonyError> {
    id_string(&data["result"])
        .map(ActivityId::from)
        .ok_or(HarmonyError::MissingField("result"))
}

#[derive(Debug, Deserialize)]
struct ConfigEntry {
    id: Value,
    label: String,
}

#[derive(Debug, Deserialize)]
struct ConfigData {
    #[serde(default)]
    activity: Vec<ConfigEntry>,
    #[serde(default)]
    device: Vec<ConfigEntry>,
}

/// Build a config snapshot from a `config` reply.
pub(crate) fn parse_config(data: Value) -> Result<HubConfig, HarmonyError> {
    let data: ConfigData = serde_json::from_value(data).map_err(HarmonyError::Decode)?;
    let activities = data
        .activity
        .into_iter()
        .map(|entry| {
            let id = id_string(&entry.id).ok_or(HarmonyError::MissingField("activity.id"))?;
            Ok(Activity {
                id: ActivityId::from(id),
                label: entry.label.trim().into(),
            })
        })
        .collect::<Result<Vec<_>, HarmonyError>>()?;
    let devices = data
        .device
        .into_iter()
        .map(|entry| {
            let id = id_string(&entry.id).ok_or(HarmonyError::MissingField("device.id"))?;
            Ok(HubDevice {
                id,
                label: entry.label.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, HarmonyError>>()?;
    Ok(HubConfig::new(activities, devices))
}

/// The hub sends ids as strings or numbers depending on the firmware.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn code_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(code) => code.as_u64(),
        Value::String(code) => code.parse().ok(),
        _ => None,
    }
}
