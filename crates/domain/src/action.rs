//! Action: an idempotent device command produced by a rule.
//!
//! Reactors, button maps and topic handlers never talk to devices directly;
//! they produce actions, and the application layer executes them against the
//! device ports. Every action is safe to repeat ("ensure on" when already on
//! is a no-op at the device level).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::power::PowerState;

/// A command for one device class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Recall a lighting scene on each of the given groups.
    Scene { scene: String, groups: Vec<String> },
    /// Switch a whole light group on or off.
    GroupPower { group: String, power: PowerState },
    /// Ensure a smart plug is in the given state.
    Plug { plug: String, power: PowerState },
    /// Ensure a PC is awake (wake-on-LAN) or shut down.
    Pc { pc: String, power: PowerState },
    /// Start a remote hub activity by label.
    StartActivity { activity: String },
    /// Power off everything the remote hub controls.
    HubPowerOff,
    /// Send a device command through the remote hub, `repeat` times.
    HubCommand {
        device: String,
        command: String,
        #[serde(default = "default_repeat")]
        repeat: u8,
    },
    /// Queue a thermostat command.
    Thermostat { command: ThermostatCommand },
}

fn default_repeat() -> u8 {
    1
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene { scene, groups } => write!(f, "scene({scene}, {})", groups.join(",")),
            Self::GroupPower { group, power } => write!(f, "group_power({group}, {power})"),
            Self::Plug { plug, power } => write!(f, "plug({plug}, {power})"),
            Self::Pc { pc, power } => write!(f, "pc({pc}, {power})"),
            Self::StartActivity { activity } => write!(f, "start_activity({activity})"),
            Self::HubPowerOff => f.write_str("hub_power_off"),
            Self::HubCommand {
                device,
                command,
                repeat,
            } => write!(f, "hub_command({device}, {command}, x{repeat})"),
            Self::Thermostat { command } => write!(f, "thermostat({command})"),
        }
    }
}

/// A command for the thermostat service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ThermostatCommand {
    /// Mark the house as empty.
    Away,
    /// Mark the house as occupied.
    Home,
    /// Set the target temperature.
    Temperature { celsius: f64 },
    /// Set the target temperature, then mark the house occupied or empty.
    Presence { home: bool, celsius: f64 },
}

impl fmt::Display for ThermostatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Away => f.write_str("away"),
            Self::Home => f.write_str("home"),
            Self::Temperature { celsius } => write!(f, "temperature {celsius:.1}"),
            Self::Presence { home: true, celsius } => write!(f, "home at {celsius:.1}"),
            Self::Presence {
                home: false,
                celsius,
            } => write!(f, "away at {celsius:.1}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_hub_command_action() {
        let a = Action::HubCommand {
            device: "Aten AV Switch".to_string(),
            command: "InputPort1".to_string(),
            repeat: 3,
        };
        assert_eq!(a.to_string(), "hub_command(Aten AV Switch, InputPort1, x3)");
    }

    #[test]
    fn should_display_thermostat_presence() {
        let a = Action::Thermostat {
            command: ThermostatCommand::Presence {
                home: false,
                celsius: 15.0,
            },
        };
        assert_eq!(a.to_string(), "thermostat(away at 15.0)");
    }

    #[test]
    fn should_deserialize_unit_variant_from_tagged_json() {
        let a: Action =
            serde_json::from_value(serde_json::json!({"type": "hub_power_off"})).unwrap();
        assert_eq!(a, Action::HubPowerOff);
    }

    #[test]
    fn should_default_hub_command_repeat_to_one() {
        let json = serde_json::json!({
            "type": "hub_command",
            "device": "TV",
            "command": "PowerOn"
        });
        let a: Action = serde_json::from_value(json).unwrap();
        assert!(matches!(a, Action::HubCommand { repeat: 1, .. }));
    }

    #[test]
    fn should_deserialize_nested_thermostat_command_from_toml() {
        let toml = r#"
            type = "thermostat"
            command = { mode = "presence", home = true, celsius = 20.0 }
        "#;
        let a: Action = toml::from_str(toml).unwrap();
        assert_eq!(
            a,
            Action::Thermostat {
                command: ThermostatCommand::Presence {
                    home: true,
                    celsius: 20.0
                }
            }
        );
    }

    #[test]
    fn should_deserialize_plug_action_from_toml() {
        let a: Action = toml::from_str("type = 'plug'\nplug = 'dac'\npower = 'off'").unwrap();
        assert_eq!(
            a,
            Action::Plug {
                plug: "dac".to_string(),
                power: PowerState::Off
            }
        );
    }
}
