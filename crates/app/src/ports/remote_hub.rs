//! Remote hub port: the universal remote that owns the current activity.

use std::future::Future;

use hometick_domain::activity::ActivityId;
use hometick_domain::error::HubError;
use hometick_domain::hub_config::HubConfig;

/// A universal remote hub (activities plus per-device commands).
pub trait RemoteHub: Send + Sync {
    /// Id of the activity the hub is currently running.
    fn current_activity_id(&self) -> impl Future<Output = Result<ActivityId, HubError>> + Send;

    /// Fetch a fresh snapshot of the hub's activities and devices.
    fn fetch_config(&self) -> impl Future<Output = Result<HubConfig, HubError>> + Send;

    /// Start the activity with the given id.
    fn start_activity(&self, id: &ActivityId)
    -> impl Future<Output = Result<(), HubError>> + Send;

    /// Power off every device the hub controls.
    fn power_off(&self) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Send a single command (e.g. `"InputPort1"`) to the device with the given id.
    fn send_command(
        &self,
        device_id: &str,
        command: &str,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Release the connection. Called once on shutdown.
    fn disconnect(&self) -> impl Future<Output = Result<(), HubError>> + Send;
}
