//! Virtual remote hub.

use hometick_app::ports::RemoteHub;
use hometick_domain::activity::{Activity, ActivityId};
use hometick_domain::error::{HubError, NotFoundError};
use hometick_domain::hub_config::{HubConfig, HubDevice};

use super::Shared;

const POWER_OFF: &str = "-1";

struct HubState {
    config: HubConfig,
    current: ActivityId,
    commands: Vec<String>,
}

/// A remote hub with a fixed activity and device catalogue.
#[derive(Clone)]
pub struct VirtualHub {
    state: Shared<HubState>,
}

impl Default for VirtualHub {
    /// `PowerOff`, `Watch TV`, `Film` and `Radio`, plus an AV switch and a
    /// TV as devices. Starts powered off.
    fn default() -> Self {
        let activity = |id: &str, label: &str| Activity {
            id: id.into(),
            label: label.into(),
        };
        let device = |id: &str, label: &str| HubDevice {
            id: id.to_string(),
            label: label.to_string(),
        };
        Self::new(HubConfig::new(
            vec![
                activity(POWER_OFF, "PowerOff"),
                activity("100", "Watch TV"),
                activity("200", "Film"),
                activity("300", "Radio"),
            ],
            vec![device("42", "Aten AV Switch"), device("43", "TV")],
        ))
    }
}

impl VirtualHub {
    /// A powered-off hub with the given catalogue.
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        Self {
            state: Shared::new(HubState {
                config,
                current: POWER_OFF.into(),
                commands: Vec::new(),
            }),
        }
    }

    /// Change the current activity as if someone used the physical remote.
    pub fn press_activity(&self, id: impl Into<ActivityId>) {
        self.state.lock().current = id.into();
    }

    #[must_use]
    pub fn current(&self) -> ActivityId {
        self.state.lock().current.clone()
    }

    /// Device commands received, as `"<device id> <command>"`.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().commands.clone()
    }
}

impl RemoteHub for VirtualHub {
    async fn current_activity_id(&self) -> Result<ActivityId, HubError> {
        Ok(self.current())
    }

    async fn fetch_config(&self) -> Result<HubConfig, HubError> {
        Ok(self.state.lock().config.clone())
    }

    async fn start_activity(&self, id: &ActivityId) -> Result<(), HubError> {
        let mut state = self.state.lock();
        if state.config.activity_label(id).is_none() {
            return Err(NotFoundError::new("activity", id.as_str()).into());
        }
        tracing::info!(activity_id = %id, "virtual hub starting activity");
        state.current = id.clone();
        Ok(())
    }

    async fn power_off(&self) -> Result<(), HubError> {
        tracing::info!("virtual hub powering off");
        self.state.lock().current = POWER_OFF.into();
        Ok(())
    }

    async fn send_command(&self, device_id: &str, command: &str) -> Result<(), HubError> {
        tracing::info!(device_id, command, "virtual hub command");
        self.state
            .lock()
            .commands
            .push(format!("{device_id} {command}"));
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), HubError> {
        Ok(())
    }
}
