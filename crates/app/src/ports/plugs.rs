//! Smart plug port.

use std::future::Future;

use hometick_domain::error::HubError;
use hometick_domain::power::PowerState;

/// A set of smart plugs addressed by their configured name.
pub trait SmartPlugs: Send + Sync {
    /// Current relay state.
    fn power(&self, plug: &str) -> impl Future<Output = Result<PowerState, HubError>> + Send;

    fn set_power(
        &self,
        plug: &str,
        power: PowerState,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Cheap reachability probe. Never fails: an unknown or silent plug is
    /// simply unreachable.
    fn is_reachable(&self, plug: &str) -> impl Future<Output = bool> + Send;
}
