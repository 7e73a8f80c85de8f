//! In-memory fakes of the ports, shared by the unit tests of this crate.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use hometick_domain::action::{Action, ThermostatCommand};
use hometick_domain::activity::{Activity, ActivityId};
use hometick_domain::error::{DeviceKind, HubError, NotFoundError};
use hometick_domain::hub_config::{HubConfig, HubDevice};
use hometick_domain::power::PowerState;
use hometick_domain::sensor::{LightReading, SensorReading};
use hometick_domain::time::Timestamp;

use crate::executor::ActionExecutor;
use crate::ports::{LightingBridge, MotionLink, PcPower, RemoteHub, SmartPlugs, Thermostat};

fn take_failure(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

// ── Remote hub ──────────────────────────────────────────────────

pub struct FakeHub {
    pub current: Mutex<ActivityId>,
    pub config: Mutex<HubConfig>,
    pub fail_next: AtomicU32,
    pub fail_config: AtomicBool,
    pub config_fetches: AtomicUsize,
    pub calls: Mutex<Vec<String>>,
    pub disconnected: AtomicBool,
}

impl FakeHub {
    pub fn new(current: &str) -> Self {
        let config = HubConfig::new(
            vec![
                Activity {
                    id: "-1".into(),
                    label: "PowerOff".into(),
                },
                Activity {
                    id: "100".into(),
                    label: "Watch TV".into(),
                },
                Activity {
                    id: "200".into(),
                    label: "Film".into(),
                },
            ],
            vec![HubDevice {
                id: "42".to_string(),
                label: "Aten AV Switch".to_string(),
            }],
        );
        Self {
            current: Mutex::new(current.into()),
            config: Mutex::new(config),
            fail_next: AtomicU32::new(0),
            fail_config: AtomicBool::new(false),
            config_fetches: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            disconnected: AtomicBool::new(false),
        }
    }

    pub fn set_current(&self, id: &str) {
        *self.current.lock().unwrap() = id.into();
    }

    pub fn add_activity(&self, id: &str, label: &str) {
        self.config.lock().unwrap().activities.push(Activity {
            id: id.into(),
            label: label.into(),
        });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RemoteHub for FakeHub {
    async fn current_activity_id(&self) -> Result<ActivityId, HubError> {
        if take_failure(&self.fail_next) {
            return Err(HubError::device(DeviceKind::RemoteHub, "timed out"));
        }
        Ok(self.current.lock().unwrap().clone())
    }

    async fn fetch_config(&self) -> Result<HubConfig, HubError> {
        self.config_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_config.load(Ordering::SeqCst) {
            return Err(HubError::device(DeviceKind::RemoteHub, "timed out"));
        }
        Ok(self.config.lock().unwrap().clone())
    }

    async fn start_activity(&self, id: &ActivityId) -> Result<(), HubError> {
        self.calls.lock().unwrap().push(format!("start {id}"));
        *self.current.lock().unwrap() = id.clone();
        Ok(())
    }

    async fn power_off(&self) -> Result<(), HubError> {
        self.calls.lock().unwrap().push("power_off".to_string());
        *self.current.lock().unwrap() = "-1".into();
        Ok(())
    }

    async fn send_command(&self, device_id: &str, command: &str) -> Result<(), HubError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("command {device_id} {command}"));
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), HubError> {
        self.disconnected.store(true, Ordering::SeqCst);
        Ok(())
    }
}

// ── Lighting bridge ─────────────────────────────────────────────

#[derive(Default)]
pub struct FakeBridge {
    pub sensors: Mutex<HashMap<String, SensorReading>>,
    pub groups_on: Mutex<HashSet<String>>,
    pub lights: Mutex<HashMap<String, LightReading>>,
    pub links: Vec<MotionLink>,
    pub failing_lights: AtomicBool,
    pub sensor_reads: AtomicUsize,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBridge {
    pub fn set_sensor(&self, name: &str, last_updated: Option<Timestamp>, button: Option<i64>) {
        self.sensors.lock().unwrap().insert(
            name.to_string(),
            SensorReading {
                name: name.to_string(),
                last_updated,
                button_event: button,
            },
        );
    }

    pub fn set_group_on(&self, group: &str, on: bool) {
        let mut groups = self.groups_on.lock().unwrap();
        if on {
            groups.insert(group.to_string());
        } else {
            groups.remove(group);
        }
    }

    pub fn set_light(&self, name: &str, on: bool, brightness: u8) {
        self.lights
            .lock()
            .unwrap()
            .insert(name.to_string(), LightReading { on, brightness });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl LightingBridge for FakeBridge {
    async fn sensor(&self, name: &str) -> Result<SensorReading, HubError> {
        self.sensor_reads.fetch_add(1, Ordering::SeqCst);
        self.sensors
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| NotFoundError::new("sensor", name).into())
    }

    async fn group_is_on(&self, group: &str) -> Result<bool, HubError> {
        Ok(self.groups_on.lock().unwrap().contains(group))
    }

    async fn set_group_power(&self, group: &str, power: PowerState) -> Result<(), HubError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("group {group} {power}"));
        self.set_group_on(group, power.is_on());
        Ok(())
    }

    async fn run_scene(&self, group: &str, scene: &str) -> Result<(), HubError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("scene {group} {scene}"));
        Ok(())
    }

    async fn light(&self, name: &str) -> Result<LightReading, HubError> {
        if self.failing_lights.load(Ordering::SeqCst) {
            return Err(HubError::device(DeviceKind::LightingBridge, "timed out"));
        }
        self.lights
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .ok_or_else(|| NotFoundError::new("light", name).into())
    }

    async fn motion_links(&self) -> Result<Vec<MotionLink>, HubError> {
        Ok(self.links.clone())
    }
}

// ── Smart plugs ─────────────────────────────────────────────────

#[derive(Default)]
pub struct FakePlugs {
    pub states: Mutex<HashMap<String, PowerState>>,
    pub unreachable: Mutex<HashSet<String>>,
    pub switches: Mutex<Vec<String>>,
}

impl FakePlugs {
    pub fn with(plug: &str, power: PowerState) -> Self {
        let plugs = Self::default();
        plugs.states.lock().unwrap().insert(plug.to_string(), power);
        plugs
    }

    pub fn state(&self, plug: &str) -> Option<PowerState> {
        self.states.lock().unwrap().get(plug).copied()
    }

    pub fn switches(&self) -> Vec<String> {
        self.switches.lock().unwrap().clone()
    }
}

impl SmartPlugs for FakePlugs {
    async fn power(&self, plug: &str) -> Result<PowerState, HubError> {
        self.state(plug)
            .ok_or_else(|| NotFoundError::new("plug", plug).into())
    }

    async fn set_power(&self, plug: &str, power: PowerState) -> Result<(), HubError> {
        self.switches.lock().unwrap().push(format!("{plug} {power}"));
        self.states.lock().unwrap().insert(plug.to_string(), power);
        Ok(())
    }

    async fn is_reachable(&self, plug: &str) -> bool {
        !self.unreachable.lock().unwrap().contains(plug)
    }
}

// ── PCs ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakePcs {
    pub online: Mutex<HashSet<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakePcs {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PcPower for FakePcs {
    async fn is_online(&self, pc: &str) -> Result<bool, HubError> {
        Ok(self.online.lock().unwrap().contains(pc))
    }

    async fn wake(&self, pc: &str) -> Result<(), HubError> {
        self.calls.lock().unwrap().push(format!("wake {pc}"));
        self.online.lock().unwrap().insert(pc.to_string());
        Ok(())
    }

    async fn shutdown(&self, pc: &str) -> Result<(), HubError> {
        self.calls.lock().unwrap().push(format!("shutdown {pc}"));
        self.online.lock().unwrap().remove(pc);
        Ok(())
    }
}

// ── Thermostat ──────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeThermostat {
    pub applied: Mutex<Vec<ThermostatCommand>>,
    pub failing: AtomicBool,
}

impl Thermostat for FakeThermostat {
    async fn apply(&self, command: &ThermostatCommand) -> Result<(), HubError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HubError::device(DeviceKind::Thermostat, "exit status 1"));
        }
        self.applied.lock().unwrap().push(command.clone());
        Ok(())
    }
}

impl Thermostat for Arc<FakeThermostat> {
    async fn apply(&self, command: &ThermostatCommand) -> Result<(), HubError> {
        self.as_ref().apply(command).await
    }
}

// ── Executor ────────────────────────────────────────────────────

/// Records every action; fails the ones listed in `failing`.
#[derive(Default)]
pub struct RecordingExecutor {
    pub executed: Mutex<Vec<Action>>,
    pub failing: Vec<Action>,
}

impl RecordingExecutor {
    pub fn failing_on(failing: Vec<Action>) -> Self {
        Self {
            executed: Mutex::new(Vec::new()),
            failing,
        }
    }

    pub fn executed(&self) -> Vec<Action> {
        self.executed.lock().unwrap().clone()
    }
}

impl ActionExecutor for RecordingExecutor {
    async fn execute(&self, action: &Action) -> Result<(), HubError> {
        if self.failing.contains(action) {
            return Err(HubError::device(DeviceKind::SmartPlug, "connection refused"));
        }
        self.executed.lock().unwrap().push(action.clone());
        Ok(())
    }
}
