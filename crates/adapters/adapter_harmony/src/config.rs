//! Harmony adapter configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the `[harmony]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HarmonyConfig {
    /// Hostname or IP address of the hub.
    pub host: String,
    pub port: u16,
    /// Remote id of the hub; discovered over HTTP when absent.
    pub remote_id: Option<String>,
    /// Upper bound for connecting and for a single request.
    pub timeout_secs: u64,
}

impl HarmonyConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Base HTTP URL of the hub, used for provisioning.
    #[must_use]
    pub fn http_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    /// WebSocket URL for the given remote id.
    #[must_use]
    pub fn ws_url(&self, remote_id: &str) -> String {
        format!(
            "ws://{}:{}/?domain=svcs.myharmony.com&hubId={remote_id}",
            self.host, self.port
        )
    }
}

impl Default for HarmonyConfig {
    fn default() -> Self {
        Self {
            host: "harmony.local".to_string(),
            port: 8088,
            remote_id: None,
            timeout_secs: 10,
        }
    }
}
