//! Hue adapter error types.

use hometick_domain::error::{DeviceKind, HubError, NotFoundError};

/// Errors specific to the Hue adapter.
#[derive(Debug, thiserror::Error)]
pub enum HueError {
    /// The bridge did not answer within the configured timeout.
    #[error("Hue bridge request timed out")]
    Timeout,

    /// The request could not be sent or its body could not be read.
    #[error("Hue bridge request failed")]
    Http(#[source] reqwest::Error),

    /// The bridge answered with a non-success HTTP status.
    #[error("Hue bridge returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The bridge answered with an error object (e.g. unauthorized user).
    #[error("Hue bridge error {kind}: {description}")]
    Api { kind: i64, description: String },

    /// A response body did not have the expected shape.
    #[error("unexpected Hue bridge response")]
    Decode(#[source] serde_json::Error),

    /// A sensor's `lastupdated` field could not be parsed.
    #[error("invalid Hue timestamp {0:?}")]
    InvalidTimestamp(String),

    /// No resource of that kind has the given name.
    #[error("Hue {kind} {name:?} not found")]
    NotFound { kind: &'static str, name: String },
}

impl HueError {
    /// Convert into a [`HubError`] for propagation across port boundaries.
    ///
    /// Missing resources become [`HubError::NotFound`] so that they are not
    /// retried; everything else is a lighting bridge communication failure.
    pub fn into_domain(self) -> HubError {
        match self {
            Self::NotFound { kind, name } => NotFoundError::new(kind, name).into(),
            other => HubError::device(DeviceKind::LightingBridge, other),
        }
    }
}

impl From<HueError> for HubError {
    fn from(err: HueError) -> Self {
        err.into_domain()
    }
}

impl From<reqwest::Error> for HueError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_api_error() {
        let err = HueError::Api {
            kind: 1,
            description: "unauthorized user".to_string(),
        };
        assert_eq!(err.to_string(), "Hue bridge error 1: unauthorized user");
    }

    #[test]
    fn should_convert_timeout_to_device_error() {
        let err: HubError = HueError::Timeout.into();
        assert!(matches!(
            err,
            HubError::Device {
                kind: DeviceKind::LightingBridge,
                ..
            }
        ));
        assert!(err.is_transient());
    }

    #[test]
    fn should_convert_missing_resource_to_not_found() {
        let err: HubError = HueError::NotFound {
            kind: "group",
            name: "Hal".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "group \"Hal\" not found");
        assert!(!err.is_transient());
    }
}
