//! Virtual smart plugs.

use std::collections::{BTreeMap, BTreeSet};

use hometick_app::ports::SmartPlugs;
use hometick_domain::error::{DeviceKind, HubError};
use hometick_domain::power::PowerState;

use super::Shared;

#[derive(Default)]
struct PlugsState {
    power: BTreeMap<String, PowerState>,
    unreachable: BTreeSet<String>,
}

/// Smart plugs that start off and are reachable unless told otherwise.
#[derive(Clone, Default)]
pub struct VirtualPlugs {
    state: Shared<PlugsState>,
}

impl VirtualPlugs {
    #[must_use]
    pub fn state(&self, plug: &str) -> PowerState {
        self.state
            .lock()
            .power
            .get(plug)
            .copied()
            .unwrap_or(PowerState::Off)
    }

    /// Take a plug off the network, or bring it back.
    pub fn set_reachable(&self, plug: &str, reachable: bool) {
        let mut state = self.state.lock();
        if reachable {
            state.unreachable.remove(plug);
        } else {
            state.unreachable.insert(plug.to_string());
        }
    }

    fn check_reachable(&self, plug: &str) -> Result<(), HubError> {
        if self.state.lock().unreachable.contains(plug) {
            return Err(HubError::device(
                DeviceKind::SmartPlug,
                format!("virtual plug {plug} is unreachable"),
            ));
        }
        Ok(())
    }
}

impl SmartPlugs for VirtualPlugs {
    async fn power(&self, plug: &str) -> Result<PowerState, HubError> {
        self.check_reachable(plug)?;
        Ok(self.state(plug))
    }

    async fn set_power(&self, plug: &str, power: PowerState) -> Result<(), HubError> {
        self.check_reachable(plug)?;
        tracing::info!(plug, %power, "virtual plug switched");
        self.state.lock().power.insert(plug.to_string(), power);
        Ok(())
    }

    async fn is_reachable(&self, plug: &str) -> bool {
        !self.state.lock().unreachable.contains(plug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_start_off_and_switch() {
        let plugs = VirtualPlugs::default();
        assert_eq!(plugs.power("dac").await.unwrap(), PowerState::Off);
        plugs.set_power("dac", PowerState::On).await.unwrap();
        assert_eq!(plugs.state("dac"), PowerState::On);
    }

    #[tokio::test]
    async fn should_fail_calls_to_unreachable_plug() {
        let plugs = VirtualPlugs::default();
        plugs.set_reachable("dac", false);

        assert!(!plugs.is_reachable("dac").await);
        let err = plugs.set_power("dac", PowerState::On).await.unwrap_err();
        assert!(err.is_transient());

        plugs.set_reachable("dac", true);
        assert!(plugs.is_reachable("dac").await);
    }
}
