//! Virtual PCs.

use std::collections::BTreeSet;

use hometick_app::ports::PcPower;
use hometick_domain::error::HubError;

use super::Shared;

/// PCs that come online when woken and go offline when shut down.
#[derive(Clone, Default)]
pub struct VirtualPcs {
    online: Shared<BTreeSet<String>>,
}

impl VirtualPcs {
    #[must_use]
    pub fn online(&self, pc: &str) -> bool {
        self.online.lock().contains(pc)
    }
}

impl PcPower for VirtualPcs {
    async fn is_online(&self, pc: &str) -> Result<bool, HubError> {
        Ok(self.online(pc))
    }

    async fn wake(&self, pc: &str) -> Result<(), HubError> {
        tracing::info!(pc, "virtual pc woken");
        self.online.lock().insert(pc.to_string());
        Ok(())
    }

    async fn shutdown(&self, pc: &str) -> Result<(), HubError> {
        tracing::info!(pc, "virtual pc shut down");
        self.online.lock().remove(pc);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_follow_wake_and_shutdown() {
        let pcs = VirtualPcs::default();
        assert!(!pcs.is_online("htpc").await.unwrap());
        pcs.wake("htpc").await.unwrap();
        assert!(pcs.is_online("htpc").await.unwrap());
        pcs.shutdown("htpc").await.unwrap();
        assert!(!pcs.online("htpc"));
    }
}
