//! Button map: which actions a wall-switch press triggers.

use serde::Deserialize;

use crate::action::Action;
use crate::sensor::ButtonPress;

/// One row of the button map.
///
/// An empty `buttons` list matches every press on the sensor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ButtonRule {
    pub sensor: String,
    #[serde(default)]
    pub buttons: Vec<i64>,
    pub actions: Vec<Action>,
}

impl ButtonRule {
    #[must_use]
    pub fn matches(&self, press: &ButtonPress) -> bool {
        if self.sensor != press.sensor {
            return false;
        }
        if self.buttons.is_empty() {
            return true;
        }
        press
            .button
            .is_some_and(|code| self.buttons.contains(&code))
    }
}

/// Ordered table of [`ButtonRule`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonMap {
    rules: Vec<ButtonRule>,
}

impl ButtonMap {
    #[must_use]
    pub fn new(rules: Vec<ButtonRule>) -> Self {
        Self { rules }
    }

    /// Sensor names referenced by at least one rule, deduplicated, in
    /// table order.
    #[must_use]
    pub fn sensors(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !names.contains(&rule.sensor.as_str()) {
                names.push(&rule.sensor);
            }
        }
        names
    }

    /// Actions of every matching rule, concatenated in table order.
    #[must_use]
    pub fn actions_for(&self, press: &ButtonPress) -> Vec<Action> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(press))
            .flat_map(|rule| rule.actions.iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
