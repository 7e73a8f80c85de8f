//! PC power: reachability, wake-on-LAN and remote shutdown.

use std::collections::BTreeMap;
use std::time::Duration;

use hometick_app::ports::PcPower;
use hometick_domain::error::{DeviceKind, HubError};
use secrecy::ExposeSecret;
use tokio::net::UdpSocket;

use crate::config::PcConfig;
use crate::error::CliError;
use crate::process::{run, run_checked};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Every configured PC.
pub struct PcFleet {
    pcs: BTreeMap<String, PcConfig>,
    ping_program: String,
    net_program: String,
    timeout: Duration,
}

impl PcFleet {
    #[must_use]
    pub fn new(pcs: BTreeMap<String, PcConfig>) -> Self {
        Self {
            pcs,
            ping_program: "ping".to_string(),
            net_program: "net".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the `ping` and `net` programs.
    #[must_use]
    pub fn with_programs(mut self, ping: impl Into<String>, net: impl Into<String>) -> Self {
        self.ping_program = ping.into();
        self.net_program = net.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn pc(&self, name: &str) -> Result<&PcConfig, CliError> {
        self.pcs
            .get(name)
            .ok_or_else(|| CliError::UnknownPc(name.to_string()))
    }

    async fn ping(&self, name: &str) -> Result<bool, CliError> {
        let pc = self.pc(name)?;
        let args = ["-c", "1", "-w", "1", pc.ip.as_str()].map(String::from);
        let output = run(&self.ping_program, &args, self.timeout).await?;
        let online = output.status.success();
        tracing::info!(pc = name, online, "pinged pc");
        Ok(online)
    }

    async fn send_magic_packet(&self, name: &str) -> Result<(), CliError> {
        let pc = self.pc(name)?;
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(CliError::WakeOnLan)?;
        socket.set_broadcast(true).map_err(CliError::WakeOnLan)?;
        socket
            .send_to(&pc.mac.magic_packet(), (pc.broadcast.as_str(), pc.wol_port))
            .await
            .map_err(CliError::WakeOnLan)?;
        tracing::info!(
            pc = name,
            mac = %pc.mac,
            broadcast = %pc.broadcast,
            "sent wake-on-LAN packet"
        );
        Ok(())
    }

    async fn remote_shutdown(&self, name: &str) -> Result<(), CliError> {
        let pc = self.pc(name)?;
        let credentials = format!("{}%{}", pc.username, pc.password.expose_secret());
        let args = [
            "rpc", "shutdown", "-f", "-t", "1", "-I", pc.ip.as_str(), "-U", credentials.as_str(),
        ]
        .map(String::from);
        run_checked(&self.net_program, &args, self.timeout).await?;
        tracing::info!(pc = name, "sent shutdown");
        Ok(())
    }
}

impl PcPower for PcFleet {
    async fn is_online(&self, pc: &str) -> Result<bool, HubError> {
        self.ping(pc).await.map_err(|err| err.into_domain(DeviceKind::Pc))
    }

    async fn wake(&self, pc: &str) -> Result<(), HubError> {
        self.send_magic_packet(pc)
            .await
            .map_err(|err| err.into_domain(DeviceKind::Pc))
    }

    async fn shutdown(&self, pc: &str) -> Result<(), HubError> {
        self.remote_shutdown(pc)
            .await
            .map_err(|err| err.into_domain(DeviceKind::Pc))
    }
}
