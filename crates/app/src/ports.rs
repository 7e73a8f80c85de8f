//! Port definitions: traits that device adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the service layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! Every port method reports failures as [`HubError`](hometick_domain::error::HubError);
//! adapters convert their own error types at this boundary and bound every
//! call with their own timeout.

pub mod lighting;
pub mod pc;
pub mod plugs;
pub mod remote_hub;
pub mod thermostat;

pub use lighting::{LightingBridge, MotionLink};
pub use pc::PcPower;
pub use plugs::SmartPlugs;
pub use remote_hub::RemoteHub;
pub use thermostat::Thermostat;
