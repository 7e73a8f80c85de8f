//! Harmony adapter error types.

use hometick_domain::error::{DeviceKind, HubError};
use tokio_tungstenite::tungstenite;

/// Errors specific to the Harmony adapter.
#[derive(Debug, thiserror::Error)]
pub enum HarmonyError {
    /// The hub did not answer within the configured timeout.
    #[error("Harmony hub request timed out")]
    Timeout,

    /// The provisioning request failed.
    #[error("Harmony provisioning request failed")]
    Provision(#[source] reqwest::Error),

    /// The WebSocket connection failed.
    #[error("Harmony WebSocket error")]
    WebSocket(#[source] Box<tungstenite::Error>),

    /// The hub closed the connection before replying.
    #[error("Harmony hub closed the connection")]
    Closed,

    /// The hub answered with a failure code.
    #[error("Harmony hub rejected {command}: {code} {msg}")]
    Rejected {
        command: &'static str,
        code: u64,
        msg: String,
    },

    /// A frame could not be decoded.
    #[error("failed to decode Harmony frame")]
    Decode(#[source] serde_json::Error),

    /// A reply lacked a field the adapter needs.
    #[error("unexpected Harmony reply: missing {0}")]
    MissingField(&'static str),
}

impl HarmonyError {
    /// Convert into a [`HubError`] for propagation across port boundaries.
    pub fn into_domain(self) -> HubError {
        HubError::device(DeviceKind::RemoteHub, self)
    }
}

impl From<HarmonyError> for HubError {
    fn from(err: HarmonyError) -> Self {
        err.into_domain()
    }
}

impl From<tungstenite::Error> for HarmonyError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                Self::Closed
            }
            other => Self::WebSocket(Box::new(other)),
        }
    }
}

impl From<reqwest::Error> for HarmonyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Provision(err)
        }
    }
}
