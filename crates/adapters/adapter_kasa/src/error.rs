//! Kasa adapter error types.

use hometick_domain::error::{DeviceKind, HubError, NotFoundError};

/// Errors specific to the Kasa adapter.
#[derive(Debug, thiserror::Error)]
pub enum KasaError {
    /// The plug did not answer within the configured timeout.
    #[error("Kasa plug timed out")]
    Timeout,

    /// The connection failed or was cut mid-frame.
    #[error("Kasa plug connection failed")]
    Io(#[from] std::io::Error),

    /// A frame was longer than the codec accepts.
    #[error("Kasa frame of {0} bytes is too large")]
    FrameTooLarge(usize),

    /// A reply was not the expected JSON.
    #[error("unexpected Kasa reply")]
    Decode(#[source] serde_json::Error),

    /// The plug reported a non-zero `err_code`.
    #[error("Kasa plug error {code}: {msg}")]
    Plug { code: i64, msg: String },

    /// No plug with that name is configured.
    #[error("unknown Kasa plug {0:?}")]
    UnknownPlug(String),
}

impl KasaError {
    /// Convert into a [`HubError`] for propagation across port boundaries.
    pub fn into_domain(self) -> HubError {
        match self {
            Self::UnknownPlug(name) => NotFoundError::new("plug", name).into(),
            other => HubError::device(DeviceKind::SmartPlug, other),
        }
    }
}

impl From<KasaError> for HubError {
    fn from(err: KasaError) -> Self {
        err.into_domain()
    }
}
