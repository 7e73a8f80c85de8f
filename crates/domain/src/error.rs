//! Common error types used across the workspace.
//!
//! Each adapter defines its own typed error and converts it into
//! [`HubError::Device`] at the port boundary, tagged with the
//! [`DeviceKind`] it talks to.

use std::fmt;

/// Boxed adapter error carried across port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The class of device an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    RemoteHub,
    LightingBridge,
    SmartPlug,
    Thermostat,
    Pc,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteHub => f.write_str("remote hub"),
            Self::LightingBridge => f.write_str("lighting bridge"),
            Self::SmartPlug => f.write_str("smart plug"),
            Self::Thermostat => f.write_str("thermostat"),
            Self::Pc => f.write_str("pc"),
        }
    }
}

/// Base error for everything that crosses a port boundary.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// A rule or inbound value violates a domain invariant.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A named activity, device, sensor or group does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Communication with a device failed.
    #[error("{kind} communication failed")]
    Device {
        kind: DeviceKind,
        #[source]
        source: BoxError,
    },

    /// A bounded in-process queue is at capacity.
    #[error("{0} queue is full")]
    QueueFull(&'static str),

    /// The consumer of an in-process queue has stopped.
    #[error("{0} queue is closed")]
    QueueClosed(&'static str),
}

impl HubError {
    /// Wrap an adapter error for the given device class.
    pub fn device(kind: DeviceKind, source: impl Into<BoxError>) -> Self {
        Self::Device {
            kind,
            source: source.into(),
        }
    }

    /// Whether retrying the same call may succeed.
    ///
    /// Only device communication failures are transient; lookups and
    /// validation fail the same way every time.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Device { .. })
    }
}

/// Displays an error followed by every error in its `source()` chain,
/// separated by `": "`.
pub struct ErrorChain<'a>(pub &'a (dyn std::error::Error + 'static));

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }
        Ok(())
    }
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A reactor, rule or topic was given an empty name.
    #[error("name must not be empty")]
    EmptyName,

    /// A topic handler received a value of the wrong shape.
    #[error("topic {topic} expects a string value")]
    InvalidTopicValue { topic: String },

    /// A hub command did not follow the `<device>/<command>` form.
    #[error("malformed hub command {0:?}, expected \"<device>/<command>\"")]
    MalformedCommand(String),

    /// A preset topic was asked for a preset it does not define.
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
}

/// A lookup by name or id found nothing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{kind} {name:?} not found")]
pub struct NotFoundError {
    /// What was looked up (e.g. `"activity"`, `"sensor"`).
    pub kind: &'static str,
    /// The name or id that was looked up.
    pub name: String,
}

impl NotFoundError {
    pub fn new(kind: &'static str, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}
