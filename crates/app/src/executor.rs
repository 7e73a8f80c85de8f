//! Action execution against the device ports.

use std::future::Future;

use hometick_domain::action::Action;
use hometick_domain::error::HubError;
use hometick_domain::power::PowerState;

use crate::ports::{LightingBridge, PcPower, RemoteHub, SmartPlugs};
use crate::retry::{DEFAULT_ATTEMPTS, with_retry};
use crate::services::catalog::HubCatalog;
use crate::thermostat_queue::ThermostatQueue;

/// Something that can carry out an [`Action`].
pub trait ActionExecutor: Send + Sync {
    fn execute(&self, action: &Action) -> impl Future<Output = Result<(), HubError>> + Send;
}

/// Execute actions in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the error of the first failing action.
pub async fn execute_all<E: ActionExecutor>(
    executor: &E,
    actions: &[Action],
) -> Result<(), HubError> {
    for action in actions {
        executor.execute(action).await?;
    }
    Ok(())
}

/// Every device port plus the shared state actions need: the hub config
/// catalog and the thermostat queue.
pub struct HubContext<H, L, P, C> {
    pub hub: H,
    pub lights: L,
    pub plugs: P,
    pub pcs: C,
    pub catalog: HubCatalog,
    pub thermostat: ThermostatQueue,
    attempts: u32,
}

impl<H, L, P, C> HubContext<H, L, P, C> {
    pub fn new(hub: H, lights: L, plugs: P, pcs: C, thermostat: ThermostatQueue) -> Self {
        Self {
            hub,
            lights,
            plugs,
            pcs,
            catalog: HubCatalog::new(DEFAULT_ATTEMPTS),
            thermostat,
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    /// Override the number of attempts per device call.
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self.catalog = HubCatalog::with_snapshot(
            self.catalog.snapshot().as_ref().clone(),
            attempts,
        );
        self
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl<H, L, P, C> HubContext<H, L, P, C>
where
    H: RemoteHub,
    L: LightingBridge,
    P: SmartPlugs,
    C: PcPower,
{
    async fn ensure_plug(&self, plug: &str, power: PowerState) -> Result<(), HubError> {
        let current = with_retry("read plug", self.attempts, || self.plugs.power(plug)).await?;
        if current == power {
            tracing::debug!(plug, %power, "plug already in state");
            return Ok(());
        }
        with_retry("switch plug", self.attempts, || self.plugs.set_power(plug, power)).await?;
        tracing::info!(plug, %power, "plug switched");
        Ok(())
    }

    async fn ensure_pc(&self, pc: &str, power: PowerState) -> Result<(), HubError> {
        let online = with_retry("ping pc", self.attempts, || self.pcs.is_online(pc)).await?;
        match (power, online) {
            (PowerState::On, false) => {
                with_retry("wake pc", self.attempts, || self.pcs.wake(pc)).await?;
                tracing::info!(pc, "wake-on-lan sent");
            }
            (PowerState::Off, true) => {
                with_retry("shutdown pc", self.attempts, || self.pcs.shutdown(pc)).await?;
                tracing::info!(pc, "shutdown requested");
            }
            _ => tracing::debug!(pc, %power, "pc already in state"),
        }
        Ok(())
    }
}

impl<H, L, P, C> ActionExecutor for HubContext<H, L, P, C>
where
    H: RemoteHub,
    L: LightingBridge,
    P: SmartPlugs,
    C: PcPower,
{
    #[tracing::instrument(skip_all, fields(%action))]
    async fn execute(&self, action: &Action) -> Result<(), HubError> {
        match action {
            Action::Scene { scene, groups } => {
                for group in groups {
                    with_retry("run scene", self.attempts, || {
                        self.lights.run_scene(group, scene)
                    })
                    .await?;
                }
                tracing::info!(scene, "scene applied");
            }
            Action::GroupPower { group, power } => {
                with_retry("switch group", self.attempts, || {
                    self.lights.set_group_power(group, *power)
                })
                .await?;
                tracing::info!(group, %power, "group switched");
            }
            Action::Plug { plug, power } => self.ensure_plug(plug, *power).await?,
            Action::Pc { pc, power } => self.ensure_pc(pc, *power).await?,
            Action::StartActivity { activity } => {
                let id = self.catalog.activity_id(&self.hub, activity).await?;
                with_retry("start activity", self.attempts, || {
                    self.hub.start_activity(&id)
                })
                .await?;
                tracing::info!(activity, "activity started");
            }
            Action::HubPowerOff => {
                with_retry("hub power off", self.attempts, || self.hub.power_off()).await?;
                tracing::info!("hub powered off");
            }
            Action::HubCommand {
                device,
                command,
                repeat,
            } => {
                let device_id = self.catalog.device_id(&self.hub, device).await?;
                for _ in 0..(*repeat).max(1) {
                    with_retry("hub command", self.attempts, || {
                        self.hub.send_command(&device_id, command)
                    })
                    .await?;
                }
            }
            Action::Thermostat { command } => self.thermostat.submit(command.clone())?,
        }
        Ok(())
    }
}
