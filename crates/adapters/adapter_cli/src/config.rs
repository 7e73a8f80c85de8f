//! CLI adapter configuration.

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::mac::MacAddr;

/// Configuration for the `[thermostat]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NestConfig {
    /// The `nest` client, looked up on `PATH` unless absolute.
    pub program: String,
    pub username: String,
    pub password: SecretString,
    /// Upper bound for one invocation of the client.
    pub timeout_secs: u64,
}

impl NestConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            program: "nest".to_string(),
            username: String::new(),
            password: SecretString::from(String::new()),
            timeout_secs: 60,
        }
    }
}

/// One `[pcs.<name>]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PcConfig {
    /// Address used for `ping` and `net rpc`.
    pub ip: String,
    pub mac: MacAddr,
    /// Broadcast address the magic packet is sent to.
    #[serde(default = "default_broadcast")]
    pub broadcast: String,
    #[serde(default = "default_wol_port")]
    pub wol_port: u16,
    /// Account allowed to shut the machine down remotely.
    #[serde(default)]
    pub username: String,
    #[serde(default = "empty_secret")]
    pub password: SecretString,
}

fn default_broadcast() -> String {
    "255.255.255.255".to_string()
}

fn default_wol_port() -> u16 {
    9
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}
