//! PC power port.

use std::future::Future;

use hometick_domain::error::HubError;

/// Wake and shut down networked PCs addressed by their configured name.
pub trait PcPower: Send + Sync {
    fn is_online(&self, pc: &str) -> impl Future<Output = Result<bool, HubError>> + Send;

    /// Send a wake-on-LAN packet.
    fn wake(&self, pc: &str) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Request a remote shutdown.
    fn shutdown(&self, pc: &str) -> impl Future<Output = Result<(), HubError>> + Send;
}
