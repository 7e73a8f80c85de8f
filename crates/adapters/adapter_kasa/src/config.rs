//! Kasa adapter configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

/// Configuration for the `[kasa]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KasaConfig {
    /// TCP port of the local protocol, the same on every plug.
    pub port: u16,
    /// Upper bound for connecting plus one request/reply exchange.
    pub timeout_secs: u64,
    /// Plug name to hostname or IP address.
    pub plugs: BTreeMap<String, String>,
}

impl KasaConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for KasaConfig {
    fn default() -> Self {
        Self {
            port: 9999,
            timeout_secs: 3,
            plugs: BTreeMap::new(),
        }
    }
}
