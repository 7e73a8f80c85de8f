//! # hometick-adapter-virtual
//!
//! Simulated devices implementing every device port, for demo mode and
//! end-to-end tests.
//!
//! ## Provided devices
//!
//! | Device | Port | Behaviour |
//! |--------|------|-----------|
//! | [`VirtualHub`] | `RemoteHub` | Fixed activity catalogue; starting an activity makes it current |
//! | [`VirtualBridge`] | `LightingBridge` | Groups, lights and sensors spring into existence when first named |
//! | [`VirtualPlugs`] | `SmartPlugs` | Plugs start off; can be marked unreachable |
//! | [`VirtualPcs`] | `PcPower` | Waking puts a PC online, shutting down takes it offline |
//! | [`VirtualThermostat`] | `Thermostat` | Remembers presence and target temperature |
//!
//! Every device is a cheap handle over shared state: clones observe and
//! drive the same device, so a test can keep one clone while the
//! orchestrator owns another.
//!
//! ## Dependency rule
//!
//! Depends on `hometick-app` (port traits) and `hometick-domain` only.

mod devices;

pub use devices::{
    VirtualBridge, VirtualHub, VirtualPcs, VirtualPlugs, VirtualThermostat, ThermostatState,
};

/// One of each virtual device.
#[derive(Clone, Default)]
pub struct VirtualHome {
    pub hub: VirtualHub,
    pub bridge: VirtualBridge,
    pub plugs: VirtualPlugs,
    pub pcs: VirtualPcs,
    pub thermostat: VirtualThermostat,
}
