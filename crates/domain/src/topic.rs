//! Inbound topic handlers.
//!
//! The inbound listener receives JSON objects of `topic -> value`. Each
//! registered topic maps its value to a list of [`Action`]s; topics that are
//! not registered are ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::action::Action;
use crate::error::ValidationError;

fn default_repeat() -> u8 {
    1
}

/// How the value of one topic is turned into actions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TopicHandler {
    /// Value is a scene name, recalled on every configured group.
    Scene { groups: Vec<String> },
    /// Value is an activity label.
    StartActivity,
    /// Value is `"<device>/<command>"`.
    HubCommand {
        #[serde(default = "default_repeat")]
        repeat: u8,
    },
    /// Value selects a named action list.
    Preset { presets: BTreeMap<String, Vec<Action>> },
}

impl TopicHandler {
    /// Map a topic value to the actions it requests.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the value is not a string, a hub
    /// command is malformed, or a preset is not defined.
    pub fn actions_for(&self, topic: &str, value: &Value) -> Result<Vec<Action>, ValidationError> {
        let value = value
            .as_str()
            .ok_or_else(|| ValidationError::InvalidTopicValue {
                topic: topic.to_string(),
            })?;
        match self {
            Self::Scene { groups } => Ok(vec![Action::Scene {
                scene: value.to_string(),
                groups: groups.clone(),
            }]),
            Self::StartActivity => Ok(vec![Action::StartActivity {
                activity: value.to_string(),
            }]),
            Self::HubCommand { repeat } => {
                let (device, command) = parse_hub_command(value)?;
                Ok(vec![Action::HubCommand {
                    device: device.to_string(),
                    command: command.to_string(),
                    repeat: *repeat,
                }])
            }
            Self::Preset { presets } => presets
                .get(value)
                .cloned()
                .ok_or_else(|| ValidationError::UnknownPreset(value.to_string())),
        }
    }
}

fn parse_hub_command(value: &str) -> Result<(&str, &str), ValidationError> {
    match value.split_once('/') {
        Some((device, command)) if !device.trim().is_empty() && !command.trim().is_empty() => {
            Ok((device.trim(), command.trim()))
        }
        _ => Err(ValidationError::MalformedCommand(value.to_string())),
    }
}

/// Registered topics, keyed by topic name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TopicTable {
    handlers: BTreeMap<String, TopicHandler>,
}

impl TopicTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler of a topic.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for a blank topic name.
    pub fn register(
        &mut self,
        topic: impl Into<String>,
        handler: TopicHandler,
    ) -> Result<(), ValidationError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.handlers.insert(topic, handler);
        Ok(())
    }

    #[must_use]
    pub fn handler(&self, topic: &str) -> Option<&TopicHandler> {
        self.handlers.get(topic)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::power::PowerState;

    #[test]
    fn should_apply_scene_to_configured_groups() {
        let handler = TopicHandler::Scene {
            groups: vec!["Tafel".to_string(), "Hal".to_string()],
        };
        let actions = handler.actions_for("hue_scene", &json!("Relax")).unwrap();
        assert_eq!(
            actions,
            vec![Action::Scene {
                scene: "Relax".to_string(),
                groups: vec!["Tafel".to_string(), "Hal".to_string()],
            }]
        );
    }

    #[test]
    fn should_split_hub_command_on_slash() {
        let handler = TopicHandler::HubCommand { repeat: 2 };
        let actions = handler
            .actions_for("command", &json!("Aten AV Switch/InputPort1"))
            .unwrap();
        assert_eq!(
            actions,
            vec![Action::HubCommand {
                device: "Aten AV Switch".to_string(),
                command: "InputPort1".to_string(),
                repeat: 2,
            }]
        );
    }

    #[test]
    fn should_reject_malformed_hub_command() {
        let handler = TopicHandler::HubCommand { repeat: 1 };
        for value in ["PowerOn", "/PowerOn", "TV/"] {
            let err = handler.actions_for("command", &json!(value)).unwrap_err();
            assert_eq!(err, ValidationError::MalformedCommand(value.to_string()));
        }
    }

    #[test]
    fn should_reject_non_string_value() {
        let err = TopicHandler::StartActivity
            .actions_for("harmony_activity", &json!(42))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTopicValue {
                topic: "harmony_activity".to_string()
            }
        );
    }

    #[test]
    fn should_select_named_preset() {
        let mut presets = BTreeMap::new();
        presets.insert(
            "FilmLight".to_string(),
            vec![Action::GroupPower {
                group: "Huiskamer".to_string(),
                power: PowerState::Off,
            }],
        );
        let handler = TopicHandler::Preset { presets };
        assert_eq!(handler.actions_for("light", &json!("FilmLight")).unwrap().len(), 1);
        assert_eq!(
            handler.actions_for("light", &json!("Disco")).unwrap_err(),
            ValidationError::UnknownPreset("Disco".to_string())
        );
    }

    #[test]
    fn should_deserialize_table_from_toml() {
        let toml = r#"
            [hue_scene]
            type = "scene"
            groups = ["Tafel", "Hal", "Keuken", "Huiskamer"]

            [harmony_activity]
            type = "start_activity"

            [command]
            type = "hub_command"
            repeat = 3
        "#;
        let table: TopicTable = toml::from_str(toml).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.handler("command"),
            Some(&TopicHandler::HubCommand { repeat: 3 })
        );
        assert!(table.handler("unknown").is_none());
    }

    #[test]
    fn should_reject_blank_topic_name() {
        let mut table = TopicTable::new();
        assert_eq!(
            table.register(" ", TopicHandler::StartActivity),
            Err(ValidationError::EmptyName)
        );
        assert!(table.register("harmony_activity", TopicHandler::StartActivity).is_ok());
        assert_eq!(table.topics().collect::<Vec<_>>(), vec!["harmony_activity"]);
    }
}
