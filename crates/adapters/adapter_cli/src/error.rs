//! CLI adapter error types.

use hometick_domain::error::{DeviceKind, HubError, NotFoundError};

/// Errors specific to the command-line adapters.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The program did not finish within the timeout and was killed.
    #[error("{program} timed out")]
    Timeout { program: String },

    /// The program could not be started.
    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program exited unsuccessfully.
    #[error("{program} exited with status {code:?}: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Sending the wake-on-LAN packet failed.
    #[error("failed to send wake-on-LAN packet")]
    WakeOnLan(#[source] std::io::Error),

    #[error("invalid MAC address {0:?}")]
    InvalidMac(String),

    /// No PC with that name is configured.
    #[error("unknown pc {0:?}")]
    UnknownPc(String),
}

impl CliError {
    /// Convert into a [`HubError`] for the device class the program drives.
    pub fn into_domain(self, kind: DeviceKind) -> HubError {
        match self {
            Self::UnknownPc(name) => NotFoundError::new("pc", name).into(),
            other => HubError::device(kind, other),
        }
    }
}
