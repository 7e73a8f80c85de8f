//! # hometick-adapter-http-axum
//!
//! Inbound HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept `PUT /` with a JSON object body of `topic -> value` pairs and
//!   enqueue it on the command inbox
//! - Answer `GET /health` with `OK`
//!
//! Handlers never touch devices: the poll loop drains the inbox and runs the
//! topic handlers one payload at a time. Every `PUT /` is answered with
//! `200 OK`, whether or not the body was usable; problems are logged.
//!
//! ## Dependency rule
//! Depends on `hometick-app` for the [`CommandSender`](hometick_app::inbox::CommandSender).
//! Never leaks axum types into the application.

pub mod inbound;
pub mod router;
pub mod server;
pub mod state;
