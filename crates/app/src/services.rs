//! Application services: activity tracking, reactor dispatch and the
//! sensor pollers.

pub mod button_poller;
pub mod catalog;
pub mod dispatch;
pub mod inactivity_sweep;
pub mod plug_linker;
pub mod tracker;
