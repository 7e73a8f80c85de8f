//! # hometick-adapter-kasa
//!
//! TP-Link Kasa smart plug adapter. Implements the
//! [`SmartPlugs`](hometick_app::ports::SmartPlugs) port over the plugs' local
//! protocol: JSON requests on TCP port 9999, length-prefixed and obfuscated
//! with an autokey XOR cipher (see [`codec`]).
//!
//! Plugs are addressed by the names configured in `[kasa.plugs]`. Every
//! request opens a fresh connection.

pub mod codec;
pub mod config;
pub mod error;

mod client;

pub use client::KasaPlugs;
pub use config::KasaConfig;
pub use error::KasaError;
