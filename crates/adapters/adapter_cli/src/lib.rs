//! # hometick-adapter-cli
//!
//! Device adapters that drive external programs:
//! - [`NestCli`] implements the
//!   [`Thermostat`](hometick_app::ports::Thermostat) port with the `nest`
//!   command-line client.
//! - [`PcFleet`] implements the [`PcPower`](hometick_app::ports::PcPower)
//!   port: `ping` for reachability, a wake-on-LAN magic packet to wake and
//!   `net rpc shutdown` to shut down.
//!
//! Programs are run without a shell, bounded by a timeout, and killed when
//! the timeout expires.

pub mod config;
pub mod error;
pub mod mac;

mod nest;
mod pc;
mod process;

pub use config::{NestConfig, PcConfig};
pub use error::CliError;
pub use mac::MacAddr;
pub use nest::NestCli;
pub use pc::PcFleet;
