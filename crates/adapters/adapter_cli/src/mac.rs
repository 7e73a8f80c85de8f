//! MAC addresses and wake-on-LAN magic packets.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::CliError;

/// Length of a wake-on-LAN magic packet: 6 sync bytes and 16 MAC copies.
pub const MAGIC_PACKET_LEN: usize = 6 + 16 * 6;

/// A 48-bit hardware address, parsed from `aa:bb:cc:dd:ee:ff` or
/// `aa-bb-cc-dd-ee-ff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct MacAddr([u8; 6]);

impl MacAddr {
    #[must_use]
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Build the magic packet that wakes the machine with this address.
    #[must_use]
    pub fn magic_packet(&self) -> [u8; MAGIC_PACKET_LEN] {
        let mut packet = [0xff; MAGIC_PACKET_LEN];
        for copy in packet[6..].chunks_exact_mut(6) {
            copy.copy_from_slice(&self.0);
        }
        packet
    }
}

impl FromStr for MacAddr {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || CliError::InvalidMac(value.to_string());
        let mut bytes = [0; 6];
        let mut parts = value.split([':', '-']);
        for byte in &mut bytes {
            let part = parts.next().filter(|part| part.len() == 2).ok_or_else(invalid)?;
            *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for MacAddr {
    type Error = CliError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}
