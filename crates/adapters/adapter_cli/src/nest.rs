//! Thermostat control through the `nest` command-line client.

use hometick_app::ports::Thermostat;
use hometick_domain::action::ThermostatCommand;
use hometick_domain::error::{DeviceKind, HubError};
use secrecy::ExposeSecret;

use crate::config::NestConfig;
use crate::error::CliError;
use crate::process::run_checked;

/// The thermostat, driven by the `nest` client.
pub struct NestCli {
    config: NestConfig,
}

impl NestCli {
    #[must_use]
    pub fn new(config: NestConfig) -> Self {
        Self { config }
    }

    async fn invoke(&self, action: &[String]) -> Result<(), CliError> {
        let mut args = vec![
            "-u".to_string(),
            self.config.username.clone(),
            "-p".to_string(),
            self.config.password.expose_secret().to_string(),
        ];
        args.extend_from_slice(action);
        tracing::debug!(program = %self.config.program, action = ?action, "running nest client");
        run_checked(&self.config.program, &args, self.config.timeout()).await
    }
}

/// Client invocations for a command, without credentials, in order.
fn invocations(command: &ThermostatCommand) -> Vec<Vec<String>> {
    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| (*part).to_string()).collect()
    }
    let temperature = |celsius: f64| args(&["-c", "temp", &format!("{celsius:.1}")]);
    let presence = |home: bool| args(&["-c", "away", if home { "--home" } else { "--away" }]);

    match command {
        ThermostatCommand::Away => vec![presence(false)],
        ThermostatCommand::Home => vec![presence(true)],
        ThermostatCommand::Temperature { celsius } => vec![temperature(*celsius)],
        ThermostatCommand::Presence { home, celsius } => {
            vec![temperature(*celsius), presence(*home)]
        }
    }
}

impl Thermostat for NestCli {
    async fn apply(&self, command: &ThermostatCommand) -> Result<(), HubError> {
        for action in invocations(command) {
            self.invoke(&action)
                .await
                .map_err(|err| err.into_domain(DeviceKind::Thermostat))?;
        }
        tracing::info!(%command, "thermostat updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn joined(command: &ThermostatCommand) -> Vec<String> {
        invocations(command)
            .into_iter()
            .map(|args| args.join(" "))
            .collect()
    }

    #[test]
    fn should_map_presence_commands_to_away_flag() {
        assert_eq!(joined(&ThermostatCommand::Away), vec!["-c away --away"]);
        assert_eq!(joined(&ThermostatCommand::Home), vec!["-c away --home"]);
    }

    #[test]
    fn should_set_temperature_before_presence() {
        let command = ThermostatCommand::Presence {
            home: false,
            celsius: 15.0,
        };
        assert_eq!(joined(&command), vec!["-c temp 15.0", "-c away --away"]);
    }

    fn cli(program: &str) -> NestCli {
        NestCli::new(NestConfig {
            program: program.to_string(),
            username: "me".to_string(),
            password: SecretString::from("pw".to_string()),
            timeout_secs: 5,
        })
    }

    #[tokio::test]
    async fn should_apply_when_client_succeeds() {
        cli("true")
            .apply(&ThermostatCommand::Temperature { celsius: 20.5 })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn should_report_client_failure_as_thermostat_error() {
        let err = cli("false").apply(&ThermostatCommand::Home).await.unwrap_err();
        assert!(matches!(
            err,
            HubError::Device {
                kind: DeviceKind::Thermostat,
                ..
            }
        ));
    }
}
