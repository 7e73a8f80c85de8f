//! Virtual device implementations: hub, bridge, plugs, PCs, thermostat.

mod bridge;
mod hub;
mod pcs;
mod plugs;
mod thermostat;

pub use bridge::VirtualBridge;
pub use hub::VirtualHub;
pub use pcs::VirtualPcs;
pub use plugs::VirtualPlugs;
pub use thermostat::{ThermostatState, VirtualThermostat};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared device state behind a mutex; a poisoned lock is recovered since
/// the state stays consistent between statements.
#[derive(Default)]
pub(crate) struct Shared<T>(Arc<Mutex<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(Mutex::new(value)))
    }

    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}
