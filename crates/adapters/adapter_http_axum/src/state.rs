//! Shared application state for axum handlers.

use hometick_app::inbox::CommandSender;

/// Application state shared across all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Enqueue handle of the poll loop's command inbox.
    pub commands: CommandSender,
}

impl AppState {
    #[must_use]
    pub fn new(commands: CommandSender) -> Self {
        Self { commands }
    }
}
