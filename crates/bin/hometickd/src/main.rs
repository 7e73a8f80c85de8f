//! # hometickd: hometick daemon
//!
//! Composition root that wires the device adapters to the poll loop and
//! starts the inbound listener.
//!
//! ## Responsibilities
//! - Load configuration (file, env vars) and initialise logging
//! - Construct the device adapters, real or virtual
//! - Build the rule tables, the command inbox and the thermostat queue
//! - Serve the inbound listener and run the poll loop
//! - Handle graceful shutdown (SIGTERM/SIGINT): release the hub, let the
//!   thermostat queue drain, exit non-zero when the loop failed
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod logging;

use std::error::Error;

use hometick_adapter_cli::{NestCli, PcFleet};
use hometick_adapter_harmony::HarmonyHub;
use hometick_adapter_http_axum::state::AppState;
use hometick_adapter_http_axum::{router, server};
use hometick_adapter_hue::HueBridge;
use hometick_adapter_kasa::KasaPlugs;
use hometick_adapter_virtual::VirtualHome;
use hometick_app::executor::HubContext;
use hometick_app::inbox;
use hometick_app::orchestrator::Orchestrator;
use hometick_app::ports::{LightingBridge, PcPower, RemoteHub, SmartPlugs, Thermostat};
use hometick_app::services::dispatch::ReactorRegistry;
use hometick_app::thermostat_queue::ThermostatQueue;
use hometick_domain::button::ButtonMap;
use hometick_domain::error::ValidationError;
use hometick_domain::reactor::ReactorConfig;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::config::Config;

/// One implementation of every device port.
struct Devices<H, L, P, C, T> {
    hub: H,
    lights: L,
    plugs: P,
    pcs: C,
    thermostat: T,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let _log_guard = logging::init(&config.logging);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        virtual_enabled = config.integrations.virtual_enabled,
        "starting hometickd"
    );

    if config.integrations.virtual_enabled {
        let home = VirtualHome::default();
        let devices = Devices {
            hub: home.hub,
            lights: home.bridge,
            plugs: home.plugs,
            pcs: home.pcs,
            thermostat: home.thermostat,
        };
        run(&config, devices).await
    } else {
        let devices = Devices {
            hub: HarmonyHub::new(config.harmony.clone())?,
            lights: HueBridge::new(&config.hue)?,
            plugs: KasaPlugs::new(config.kasa.clone()),
            pcs: PcFleet::new(config.pcs.clone()),
            thermostat: NestCli::new(config.thermostat.clone()),
        };
        run(&config, devices).await
    }
}

async fn run<H, L, P, C, T>(
    config: &Config,
    devices: Devices<H, L, P, C, T>,
) -> Result<(), Box<dyn Error>>
where
    H: RemoteHub,
    L: LightingBridge,
    P: SmartPlugs,
    C: PcPower,
    T: Thermostat + 'static,
{
    let reactors = reactor_registry(&config.reactors)?;
    let (thermostat, worker) =
        ThermostatQueue::spawn(devices.thermostat, config.schedule.thermostat_queue);
    let (commands, inbox) = inbox::channel(config.topics.clone(), config.server.inbox_capacity);
    let context = HubContext::new(
        devices.hub,
        devices.lights,
        devices.plugs,
        devices.pcs,
        thermostat,
    )
    .with_attempts(config.schedule.attempts);

    let mut orchestrator = Orchestrator::new(context, inbox, config.schedule.schedule())
        .with_reactors(reactors)
        .with_buttons(ButtonMap::new(config.buttons.clone()))
        .with_inactivity(config.inactivity.rules.clone())
        .with_plug_links(config.plug_links.clone());
    if let Some(timeout_secs) = config.inactivity.discover_timeout_secs {
        orchestrator = orchestrator.with_inactivity_discovery(timeout_secs);
    }

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(server::serve(
        listener,
        router::build(AppState::new(commands)),
        async {
            stopped.await.ok();
        },
    ));

    let result = orchestrator.run(shutdown_signal()).await;

    // Dropping the loop drops the last queue handle, so the worker stops
    // once the remaining commands have run.
    drop(orchestrator);
    worker.finish(config.schedule.shutdown_grace()).await;

    stop.send(()).ok();
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::warn!(error = %err, "inbound listener failed"),
        Err(err) => tracing::warn!(error = %err, "inbound listener task failed"),
    }

    result?;
    tracing::info!("stopped");
    Ok(())
}

fn reactor_registry(configs: &[ReactorConfig]) -> Result<ReactorRegistry, ValidationError> {
    let mut registry = ReactorRegistry::new();
    for config in configs {
        registry.register(config.clone().build()?);
    }
    Ok(registry)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
