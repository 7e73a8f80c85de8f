//! # hometick-adapter-harmony
//!
//! Logitech Harmony hub adapter. Implements the
//! [`RemoteHub`](hometick_app::ports::RemoteHub) port against the hub's
//! local WebSocket API on port 8088.
//!
//! ## Protocol
//! - The remote id is discovered once through an HTTP `POST` to the hub
//!   (`setup.account?getProvisionInfo`), unless configured.
//! - Every request is a JSON frame carrying a request id; the hub answers
//!   with the same id and a status `code`. Code `100` is an intermediate
//!   progress report, `200` is success, anything else is a failure.
//! - Unsolicited notifications (state digests) are skipped.
//! - Device commands are a `holdAction` press followed by a release, with
//!   no reply expected.
//!
//! A single connection is opened lazily and reused; it is dropped after any
//! failure so the next call reconnects.

pub mod config;
pub mod error;

mod client;
mod protocol;

pub use client::HarmonyHub;
pub use config::HarmonyConfig;
pub use error::HarmonyError;
