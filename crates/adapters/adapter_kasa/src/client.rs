//! Smart plug client.

use hometick_app::ports::SmartPlugs;
use hometick_domain::error::HubError;
use hometick_domain::power::PowerState;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::codec::{read_frame, write_frame};
use crate::config::KasaConfig;
use crate::error::KasaError;

/// The `system.get_sysinfo` fields the adapter reads.
#[derive(Debug, Deserialize)]
struct SysInfo {
    #[serde(default)]
    alias: String,
    relay_state: u8,
}

/// Every configured Kasa plug.
pub struct KasaPlugs {
    config: KasaConfig,
}

impl KasaPlugs {
    #[must_use]
    pub fn new(config: KasaConfig) -> Self {
        Self { config }
    }

    fn host(&self, plug: &str) -> Result<&str, KasaError> {
        self.config
            .plugs
            .get(plug)
            .map(String::as_str)
            .ok_or_else(|| KasaError::UnknownPlug(plug.to_string()))
    }

    async fn connect(&self, host: &str) -> Result<TcpStream, KasaError> {
        timeout(
            self.config.timeout(),
            TcpStream::connect((host, self.config.port)),
        )
        .await
        .map_err(|_| KasaError::Timeout)?
        .map_err(KasaError::from)
    }

    /// Send one request to the plug and return the reply of the
    /// `system.<method>` call, after checking its `err_code`.
    async fn call(&self, plug: &str, method: &str, params: Value) -> Result<Value, KasaError> {
        let host = self.host(plug)?;
        let request = json!({ "system": { method: params } }).to_string();
        tracing::debug!(plug, host, method, "kasa request");

        let exchange = async {
            let mut stream = self.connect(host).await?;
            write_frame(&mut stream, request.as_bytes()).await?;
            read_frame(&mut stream).await
        };
        let reply = timeout(self.config.timeout(), exchange)
            .await
            .map_err(|_| KasaError::Timeout)??;

        let mut reply: Value = serde_json::from_slice(&reply).map_err(KasaError::Decode)?;
        let result = reply
            .pointer_mut(&format!("/system/{method}"))
            .map(Value::take)
            .unwrap_or_default();
        check_err_code(&result)?;
        Ok(result)
    }

    async fn sysinfo(&self, plug: &str) -> Result<SysInfo, KasaError> {
        let result = self.call(plug, "get_sysinfo", json!({})).await?;
        serde_json::from_value(result).map_err(KasaError::Decode)
    }

    async fn switch(&self, plug: &str, power: PowerState) -> Result<(), KasaError> {
        let state = u8::from(power.is_on());
        self.call(plug, "set_relay_state", json!({ "state": state }))
            .await?;
        tracing::info!(plug, %power, "switched kasa plug");
        Ok(())
    }
}

fn check_err_code(result: &Value) -> Result<(), KasaError> {
    match result["err_code"].as_i64() {
        Some(0) | None => Ok(()),
        Some(code) => Err(KasaError::Plug {
            code,
            msg: result["err_msg"].as_str().unwrap_or_default().to_string(),
        }),
    }
}

impl SmartPlugs for KasaPlugs {
    async fn power(&self, plug: &str) -> Result<PowerState, HubError> {
        let info = self.sysinfo(plug).await?;
        let power = PowerState::from(info.relay_state != 0);
        tracing::debug!(plug, alias = %info.alias, %power, "kasa plug state");
        Ok(power)
    }

    async fn set_power(&self, plug: &str, power: PowerState) -> Result<(), HubError> {
        Ok(self.switch(plug, power).await?)
    }

    /// A plug is reachable when its TCP port accepts a connection in time.
    async fn is_reachable(&self, plug: &str) -> bool {
        let Ok(host) = self.host(plug) else {
            return false;
        };
        match self.connect(host).await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(plug, host, error = %err, "kasa plug not reachable");
                false
            }
        }
    }
}
