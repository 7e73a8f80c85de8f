//! Poll loop: wires the services together and runs them on a fixed tick.

use std::future::Future;
use std::time::Duration;

use hometick_domain::button::ButtonMap;
use hometick_domain::error::{ErrorChain, HubError};
use hometick_domain::inactivity::InactivityRule;
use hometick_domain::plug_link::PlugLink;
use hometick_domain::time::now;

use crate::executor::HubContext;
use crate::inbox::CommandInbox;
use crate::ports::{LightingBridge, PcPower, RemoteHub, SmartPlugs};
use crate::services::button_poller::ButtonPoller;
use crate::services::dispatch::ReactorRegistry;
use crate::services::inactivity_sweep::InactivitySweep;
use crate::services::plug_linker::PlugLinker;
use crate::services::tracker::ActivityTracker;

/// How often each step of the loop runs, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub tick: Duration,
    pub sensor_every: u64,
    pub activity_every: u64,
    pub heartbeat_every: u64,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            sensor_every: 5,
            activity_every: 60,
            heartbeat_every: 600,
        }
    }
}

fn due(iteration: u64, every: u64) -> bool {
    iteration % every.max(1) == 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    ShuttingDown,
}

/// Owns every service and the device context, and runs the poll loop.
pub struct Orchestrator<H, L, P, C> {
    context: HubContext<H, L, P, C>,
    inbox: CommandInbox,
    schedule: Schedule,
    tracker: ActivityTracker,
    reactors: ReactorRegistry,
    buttons: ButtonPoller,
    inactivity: InactivitySweep,
    plug_links: PlugLinker,
    discovery_timeout_secs: Option<u64>,
    iteration: u64,
    state: RunState,
}

impl<H, L, P, C> Orchestrator<H, L, P, C>
where
    H: RemoteHub,
    L: LightingBridge,
    P: SmartPlugs,
    C: PcPower,
{
    pub fn new(context: HubContext<H, L, P, C>, inbox: CommandInbox, schedule: Schedule) -> Self {
        let attempts = context.attempts();
        Self {
            context,
            inbox,
            schedule,
            tracker: ActivityTracker::new(attempts),
            reactors: ReactorRegistry::new(),
            buttons: ButtonPoller::new(ButtonMap::default(), now(), attempts),
            inactivity: InactivitySweep::new(Vec::new(), attempts),
            plug_links: PlugLinker::new(Vec::new()),
            discovery_timeout_secs: None,
            iteration: 0,
            state: RunState::Running,
        }
    }

    #[must_use]
    pub fn with_reactors(mut self, reactors: ReactorRegistry) -> Self {
        self.reactors = reactors;
        self
    }

    /// Presses that happened before this call are never dispatched.
    #[must_use]
    pub fn with_buttons(mut self, map: ButtonMap) -> Self {
        self.buttons = ButtonPoller::new(map, now(), self.context.attempts());
        self
    }

    #[must_use]
    pub fn with_inactivity(mut self, rules: Vec<InactivityRule>) -> Self {
        self.inactivity = InactivitySweep::new(rules, self.context.attempts());
        self
    }

    /// Also add inactivity rules for the bridge's motion sensors at start-up.
    #[must_use]
    pub fn with_inactivity_discovery(mut self, timeout_secs: u64) -> Self {
        self.discovery_timeout_secs = Some(timeout_secs);
        self
    }

    #[must_use]
    pub fn with_plug_links(mut self, links: Vec<PlugLink>) -> Self {
        self.plug_links = PlugLinker::new(links);
        self
    }

    #[must_use]
    pub fn context(&self) -> &HubContext<H, L, P, C> {
        &self.context
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Establish the activity baseline and discover inactivity rules.
    ///
    /// # Errors
    ///
    /// Returns the hub error if the initial activity cannot be read.
    #[tracing::instrument(skip_all)]
    pub async fn start(&mut self) -> Result<(), HubError> {
        self.tracker
            .prime(&self.context.hub, &self.context.catalog)
            .await?;
        if let Some(timeout_secs) = self.discovery_timeout_secs {
            match self
                .inactivity
                .discover(&self.context.lights, timeout_secs)
                .await
            {
                Ok(added) => tracing::info!(added, "motion sensor discovery done"),
                Err(err) => {
                    tracing::warn!(error = %ErrorChain(&err), "motion sensor discovery failed");
                }
            }
        }
        tracing::info!(
            reactors = self.reactors.len(),
            inactivity_rules = self.inactivity.rules().len(),
            "hub started"
        );
        Ok(())
    }

    /// Run one loop iteration, without the trailing sleep.
    ///
    /// # Errors
    ///
    /// Returns any device error that escaped the retry policy. Reactor,
    /// button action and topic failures are logged and never returned.
    pub async fn run_iteration(&mut self) -> Result<(), HubError> {
        let iteration = self.iteration;
        self.iteration = iteration.wrapping_add(1);

        let drained = self.inbox.drain(&self.context).await;
        if drained.payloads > 0 {
            tracing::debug!(?drained, "inbox drained");
        }

        let sensors_due = due(iteration, self.schedule.sensor_every);
        if sensors_due {
            self.check_sensors().await?;
        }

        if due(iteration, self.schedule.activity_every) {
            if let Some(transition) = self
                .tracker
                .poll(&self.context.hub, &self.context.catalog)
                .await?
            {
                tracing::info!(%transition, "activity changed");
                self.reactors.dispatch(&transition, &self.context).await;
                // Lights usually change with the activity.
                if !sensors_due {
                    self.check_sensors().await?;
                }
            }
            if let Some(label) = self.tracker.current() {
                self.reactors.resync(label, &self.context).await;
            }
        }

        if due(iteration, self.schedule.heartbeat_every) {
            tracing::info!(iteration, "still alive");
        }
        Ok(())
    }

    async fn check_sensors(&mut self) -> Result<(), HubError> {
        self.buttons
            .check_all(&self.context.lights, &self.context)
            .await?;
        self.inactivity.sweep(&self.context.lights, now()).await?;
        self.plug_links
            .check_all(&self.context.lights, &self.context.plugs)
            .await;
        Ok(())
    }

    /// Run until `shutdown` resolves or an iteration fails, then release
    /// the hub connection.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the loop.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), HubError>
    where
        F: Future<Output = ()>,
    {
        let result = self.run_until(shutdown).await;
        self.state = RunState::ShuttingDown;
        match &result {
            Ok(()) => tracing::info!("shutting down"),
            Err(err) => {
                tracing::error!(error = %ErrorChain(err), "poll loop failed, shutting down");
            }
        }
        if let Err(err) = self.context.hub.disconnect().await {
            tracing::warn!(error = %ErrorChain(&err), "hub disconnect failed");
        }
        result
    }

    async fn run_until<F>(&mut self, shutdown: F) -> Result<(), HubError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tokio::select! {
            () = &mut shutdown => return Ok(()),
            started = self.start() => started?,
        }
        loop {
            tokio::select! {
                () = &mut shutdown => return Ok(()),
                step = self.step() => step?,
            }
        }
    }

    async fn step(&mut self) -> Result<(), HubError> {
        self.run_iteration().await?;
        tokio::time::sleep(self.schedule.tick).await;
        Ok(())
    }
}
