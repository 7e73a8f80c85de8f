//! # hometick-domain
//!
//! Pure domain model for the hometick home automation hub.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, power states
//! - Define **Activities** (the operating mode reported by the remote hub)
//!   and the **Transitions** between them
//! - Define the **hub config snapshot** used to resolve vendor ids to labels
//! - Define **Actions** (idempotent device commands), the vocabulary of every
//!   rule table
//! - Define the rule tables: **Reactors**, **button maps**, **inactivity
//!   rules**, **plug links** and inbound **topic handlers**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod power;
pub mod time;

pub mod action;
pub mod activity;
pub mod button;
pub mod hub_config;
pub mod inactivity;
pub mod plug_link;
pub mod reactor;
pub mod sensor;
pub mod topic;
