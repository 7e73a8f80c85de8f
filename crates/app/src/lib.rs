//! # hometick-app
//!
//! Application layer: services and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that device adapters must implement:
//!   - `RemoteHub`: current activity, config snapshot, activities and commands
//!   - `LightingBridge`: sensors, groups, scenes and lights
//!   - `SmartPlugs`: relay state and reachability
//!   - `PcPower`: ping, wake-on-LAN and remote shutdown
//!   - `Thermostat`: away/home and target temperature
//! - Provide the services that run on top of them:
//!   - `ActivityTracker` and `HubCatalog`: detect activity transitions
//!   - `ReactorRegistry`: fan transitions out to reactors
//!   - `ButtonPoller`, `InactivitySweep`, `PlugLinker`: sensor-driven rules
//!   - `CommandInbox`: inbound topic commands, drained by the loop
//!   - `ThermostatQueue`: bounded queue with a single worker
//!   - `Orchestrator`: the poll loop
//!
//! ## Dependency rule
//! Depends on `hometick-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod executor;
pub mod inbox;
pub mod orchestrator;
pub mod ports;
pub mod retry;
pub mod services;
pub mod thermostat_queue;

#[cfg(test)]
pub(crate) mod testing;
