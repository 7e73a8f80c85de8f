//! Reactors: rules invoked on every detected activity transition.
//!
//! A [`Reactor`] maps a [`Transition`] to the [`Action`]s that should run.
//! Reactors are pure: executing the actions (and guarding failures) is the
//! job of the application layer's registry.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::action::Action;
use crate::activity::{ActivityLabel, Transition};
use crate::error::ValidationError;

/// Capability implemented by every reactor variant.
pub trait Reactor {
    /// Name used in logs and dispatch reports.
    fn name(&self) -> &str;

    /// Actions to run for this transition. Empty means "nothing to do".
    fn on_transition(&self, transition: &Transition) -> Vec<Action>;

    /// Whether the reactor should also be re-applied after every poll,
    /// against the current label, even when nothing changed.
    fn resync(&self) -> bool {
        false
    }
}

/// Boxed reactor as stored by the registry.
pub type DynReactor = Box<dyn Reactor + Send + Sync>;

/// Runs `on_match` when the new label is in the set, `otherwise` when not.
#[derive(Debug, Clone)]
pub struct LabelSetReactor {
    name: String,
    labels: BTreeSet<ActivityLabel>,
    on_match: Vec<Action>,
    otherwise: Vec<Action>,
    resync: bool,
}

impl LabelSetReactor {
    pub fn new<L>(name: impl Into<String>, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<ActivityLabel>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            on_match: Vec::new(),
            otherwise: Vec::new(),
            resync: false,
        }
    }

    #[must_use]
    pub fn on_match(mut self, actions: Vec<Action>) -> Self {
        self.on_match = actions;
        self
    }

    #[must_use]
    pub fn otherwise(mut self, actions: Vec<Action>) -> Self {
        self.otherwise = actions;
        self
    }

    #[must_use]
    pub fn with_resync(mut self, resync: bool) -> Self {
        self.resync = resync;
        self
    }
}

impl Reactor for LabelSetReactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_transition(&self, transition: &Transition) -> Vec<Action> {
        if self.labels.contains(&transition.to) {
            self.on_match.clone()
        } else {
            self.otherwise.clone()
        }
    }

    fn resync(&self) -> bool {
        self.resync
    }
}

/// Per-label action lists, for devices that need a specific command
/// sequence for each activity.
#[derive(Debug, Clone)]
pub struct LabelMapReactor {
    name: String,
    by_label: BTreeMap<ActivityLabel, Vec<Action>>,
    fallback: Vec<Action>,
    resync: bool,
}

impl LabelMapReactor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            by_label: BTreeMap::new(),
            fallback: Vec::new(),
            resync: false,
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<ActivityLabel>, actions: Vec<Action>) -> Self {
        self.by_label.insert(label.into(), actions);
        self
    }

    #[must_use]
    pub fn fallback(mut self, actions: Vec<Action>) -> Self {
        self.fallback = actions;
        self
    }

    #[must_use]
    pub fn with_resync(mut self, resync: bool) -> Self {
        self.resync = resync;
        self
    }
}

impl Reactor for LabelMapReactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_transition(&self, transition: &Transition) -> Vec<Action> {
        self.by_label
            .get(&transition.to)
            .unwrap_or(&self.fallback)
            .clone()
    }

    fn resync(&self) -> bool {
        self.resync
    }
}

/// Fires only when a transition crosses the boundary of a label set:
/// `enter` when moving into the set, `leave` when moving out of it.
#[derive(Debug, Clone)]
pub struct EdgeReactor {
    name: String,
    labels: BTreeSet<ActivityLabel>,
    enter: Vec<Action>,
    leave: Vec<Action>,
}

impl EdgeReactor {
    pub fn new<L>(name: impl Into<String>, labels: impl IntoIterator<Item = L>) -> Self
    where
        L: Into<ActivityLabel>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            enter: Vec::new(),
            leave: Vec::new(),
        }
    }

    #[must_use]
    pub fn on_enter(mut self, actions: Vec<Action>) -> Self {
        self.enter = actions;
        self
    }

    #[must_use]
    pub fn on_leave(mut self, actions: Vec<Action>) -> Self {
        self.leave = actions;
        self
    }
}

impl Reactor for EdgeReactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_transition(&self, transition: &Transition) -> Vec<Action> {
        let was_inside = transition
            .from
            .as_ref()
            .is_some_and(|label| self.labels.contains(label));
        let is_inside = self.labels.contains(&transition.to);
        match (was_inside, is_inside) {
            (false, true) => self.enter.clone(),
            (true, false) => self.leave.clone(),
            _ => Vec::new(),
        }
    }
}

/// Declarative reactor definition, as found in the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactorConfig {
    LabelSet {
        name: String,
        labels: Vec<String>,
        #[serde(default)]
        on_match: Vec<Action>,
        #[serde(default)]
        otherwise: Vec<Action>,
        #[serde(default)]
        resync: bool,
    },
    LabelMap {
        name: String,
        #[serde(default)]
        labels: BTreeMap<String, Vec<Action>>,
        #[serde(default)]
        fallback: Vec<Action>,
        #[serde(default)]
        resync: bool,
    },
    Edge {
        name: String,
        labels: Vec<String>,
        #[serde(default)]
        enter: Vec<Action>,
        #[serde(default)]
        leave: Vec<Action>,
    },
}

impl ReactorConfig {
    /// Turn the definition into a registered-ready reactor.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if the reactor has no name.
    pub fn build(self) -> Result<DynReactor, ValidationError> {
        let reactor: DynReactor = match self {
            Self::LabelSet {
                name,
                labels,
                on_match,
                otherwise,
                resync,
            } => {
                ensure_named(&name)?;
                Box::new(
                    LabelSetReactor::new(name, labels)
                        .on_match(on_match)
                        .otherwise(otherwise)
                        .with_resync(resync),
                )
            }
            Self::LabelMap {
                name,
                labels,
                fallback,
                resync,
            } => {
                ensure_named(&name)?;
                let reactor = labels
                    .into_iter()
                    .fold(LabelMapReactor::new(name), |reactor, (label, actions)| {
                        reactor.label(label, actions)
                    });
                Box::new(reactor.fallback(fallback).with_resync(resync))
            }
            Self::Edge {
                name,
                labels,
                enter,
                leave,
            } => {
                ensure_named(&name)?;
                Box::new(EdgeReactor::new(name, labels).on_enter(enter).on_leave(leave))
            }
        };
        Ok(reactor)
    }
}

fn ensure_named(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}
