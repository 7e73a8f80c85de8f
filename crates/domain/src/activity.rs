//! Activities: the named operating mode reported by the remote hub
//! (e.g. `"Watch TV"`, `"PowerOff"`), and transitions between them.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_name {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the inner string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_name!(
    /// Opaque activity identifier as reported by the remote hub.
    ActivityId
);

define_name!(
    /// Human-readable activity label resolved from the hub config.
    ActivityLabel
);

impl ActivityLabel {
    /// Sentinel label for an id the hub config does not know.
    pub const UNKNOWN: &'static str = "unknown";

    /// The [`UNKNOWN`](Self::UNKNOWN) sentinel.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN)
    }

    /// Whether this is the unresolved sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }
}

impl PartialEq<str> for ActivityLabel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ActivityLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A hub activity: vendor id plus its resolved label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub label: ActivityLabel,
}

/// A detected change of the hub's current activity.
///
/// `from` is `None` when nothing was observed before (the tracker has not
/// been polled yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Option<ActivityLabel>,
    pub to: ActivityLabel,
}

impl Transition {
    #[must_use]
    pub fn new(from: Option<ActivityLabel>, to: ActivityLabel) -> Self {
        Self { from, to }
    }

    /// A self-transition used to re-apply idempotent rules for the current label.
    #[must_use]
    pub fn steady(label: ActivityLabel) -> Self {
        Self {
            from: Some(label.clone()),
            to: label,
        }
    }

    /// Whether the label did not actually change.
    #[must_use]
    pub fn is_steady(&self) -> bool {
        self.from.as_ref() == Some(&self.to)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "[{from}] --> [{}]", self.to),
            None => write!(f, "[] --> [{}]", self.to),
        }
    }
}
