//! # hometick-adapter-hue
//!
//! Philips Hue bridge adapter. Implements the
//! [`LightingBridge`](hometick_app::ports::LightingBridge) port against the
//! bridge's local v1 REST API (`/api/<username>/…`).
//!
//! Sensors, groups, scenes and lights are addressed by name; every call
//! lists the relevant collection and resolves the name to the bridge id,
//! so renames on the bridge are picked up without a restart.

pub mod config;
pub mod error;

mod client;
mod model;

pub use client::HueBridge;
pub use config::HueConfig;
pub use error::HueError;
