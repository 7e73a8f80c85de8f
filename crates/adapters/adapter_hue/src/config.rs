//! Hue adapter configuration.

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Configuration for the `[hue]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HueConfig {
    /// Base URL of the bridge, without the `/api` path.
    pub base_url: String,
    /// Whitelisted API username created by pressing the link button.
    pub username: SecretString,
    /// Upper bound for a single bridge request.
    pub timeout_secs: u64,
}

impl HueConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for HueConfig {
    fn default() -> Self {
        Self {
            base_url: "http://philips-hue.local".to_string(),
            username: SecretString::from(String::new()),
            timeout_secs: 5,
        }
    }
}
