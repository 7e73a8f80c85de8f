//! Virtual thermostat.

use hometick_app::ports::Thermostat;
use hometick_domain::action::ThermostatCommand;
use hometick_domain::error::HubError;

use super::Shared;

/// What the thermostat was last told.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermostatState {
    pub home: bool,
    pub target_celsius: f64,
}

impl Default for ThermostatState {
    fn default() -> Self {
        Self {
            home: true,
            target_celsius: 20.0,
        }
    }
}

#[derive(Clone, Default)]
pub struct VirtualThermostat {
    state: Shared<ThermostatState>,
}

impl VirtualThermostat {
    #[must_use]
    pub fn state(&self) -> ThermostatState {
        *self.state.lock()
    }
}

impl Thermostat for VirtualThermostat {
    async fn apply(&self, command: &ThermostatCommand) -> Result<(), HubError> {
        tracing::info!(%command, "virtual thermostat updated");
        let mut state = self.state.lock();
        match *command {
            ThermostatCommand::Away => state.home = false,
            ThermostatCommand::Home => state.home = true,
            ThermostatCommand::Temperature { celsius } => state.target_celsius = celsius,
            ThermostatCommand::Presence { home, celsius } => {
                state.home = home;
                state.target_celsius = celsius;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_track_presence_and_temperature() {
        let thermostat = VirtualThermostat::default();
        thermostat
            .apply(&ThermostatCommand::Presence {
                home: false,
                celsius: 15.0,
            })
            .await
            .unwrap();
        assert_eq!(
            thermostat.state(),
            ThermostatState {
                home: false,
                target_celsius: 15.0
            }
        );

        thermostat.apply(&ThermostatCommand::Home).await.unwrap();
        assert!(thermostat.state().home);
    }
}
