//! Thermostat port.

use std::future::Future;

use hometick_domain::action::ThermostatCommand;
use hometick_domain::error::HubError;

/// A thermostat service. Calls may be slow, so the application only ever
/// reaches it through the
/// [`ThermostatQueue`](crate::thermostat_queue::ThermostatQueue) worker.
pub trait Thermostat: Send + Sync {
    fn apply(&self, command: &ThermostatCommand)
    -> impl Future<Output = Result<(), HubError>> + Send;
}
