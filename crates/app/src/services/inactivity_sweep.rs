//! Inactivity sweep: switch light groups off after motion sensors go quiet.

use hometick_domain::error::HubError;
use hometick_domain::inactivity::InactivityRule;
use hometick_domain::power::PowerState;
use hometick_domain::time::Timestamp;

use crate::ports::LightingBridge;
use crate::retry::with_retry;

pub struct InactivitySweep {
    rules: Vec<InactivityRule>,
    attempts: u32,
}

impl InactivitySweep {
    #[must_use]
    pub fn new(rules: Vec<InactivityRule>, attempts: u32) -> Self {
        Self { rules, attempts }
    }

    #[must_use]
    pub fn rules(&self) -> &[InactivityRule] {
        &self.rules
    }

    /// Add a rule for every (motion sensor, group) link the bridge reports,
    /// with the given timeout. Pairs that already have a rule are skipped.
    ///
    /// Returns the number of rules added.
    ///
    /// # Errors
    ///
    /// Returns the bridge error if the links cannot be read.
    #[tracing::instrument(skip(self, bridge))]
    pub async fn discover<L: LightingBridge>(
        &mut self,
        bridge: &L,
        timeout_secs: u64,
    ) -> Result<usize, HubError> {
        let links =
            with_retry("read motion links", self.attempts, || bridge.motion_links()).await?;
        let mut added = 0;
        for link in links {
            if self
                .rules
                .iter()
                .any(|rule| rule.sensor == link.sensor && rule.group == link.group)
            {
                continue;
            }
            tracing::info!(sensor = %link.sensor, group = %link.group, "discovered motion sensor");
            self.rules
                .push(InactivityRule::new(link.sensor, link.group, timeout_secs));
            added += 1;
        }
        Ok(added)
    }

    /// Switch off every group whose sensor has been quiet for longer than
    /// its threshold and that is still on.
    ///
    /// Returns the number of groups switched off.
    ///
    /// # Errors
    ///
    /// Returns the bridge error of the first failing call.
    pub async fn sweep<L: LightingBridge>(
        &self,
        bridge: &L,
        now: Timestamp,
    ) -> Result<usize, HubError> {
        let mut switched = 0;
        for rule in &self.rules {
            let reading =
                with_retry("read sensor", self.attempts, || bridge.sensor(&rule.sensor)).await?;
            if !rule.is_expired(reading.last_updated, now) {
                continue;
            }
            let on = with_retry("read group", self.attempts, || bridge.group_is_on(&rule.group))
                .await?;
            if !on {
                continue;
            }
            with_retry("switch group", self.attempts, || {
                bridge.set_group_power(&rule.group, PowerState::Off)
            })
            .await?;
            tracing::info!(
                sensor = %rule.sensor,
                group = %rule.group,
                timeout_secs = rule.timeout_secs,
                "no motion, lights off"
            );
            switched += 1;
        }
        Ok(switched)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use hometick_domain::time::now;

    use super::*;
    use crate::ports::MotionLink;
    use crate::testing::FakeBridge;

    fn berging() -> InactivitySweep {
        InactivitySweep::new(vec![InactivityRule::new("Berging sensor", "Berging", 120)], 3)
    }

    #[tokio::test]
    async fn should_leave_group_alone_within_threshold() {
        let now = now();
        let bridge = FakeBridge::default();
        bridge.set_sensor("Berging sensor", Some(now - TimeDelta::seconds(60)), None);
        bridge.set_group_on("Berging", true);

        assert_eq!(berging().sweep(&bridge, now).await.unwrap(), 0);
        assert!(bridge.calls().is_empty());
    }

    #[tokio::test]
    async fn should_switch_group_off_exactly_once_after_threshold() {
        let now = now();
        let bridge = FakeBridge::default();
        bridge.set_sensor("Berging sensor", Some(now - TimeDelta::seconds(180)), None);
        bridge.set_group_on("Berging", true);
        let sweep = berging();

        assert_eq!(sweep.sweep(&bridge, now).await.unwrap(), 1);
        assert_eq!(sweep.sweep(&bridge, now).await.unwrap(), 0);
        assert_eq!(bridge.calls(), vec!["group Berging off"]);
    }

    #[tokio::test]
    async fn should_not_command_group_already_off() {
        let now = now();
        let bridge = FakeBridge::default();
        bridge.set_sensor("Berging sensor", None, None);

        assert_eq!(berging().sweep(&bridge, now).await.unwrap(), 0);
        assert!(bridge.calls().is_empty());
    }

    #[tokio::test]
    async fn should_treat_never_updated_sensor_as_expired() {
        let bridge = FakeBridge::default();
        bridge.set_sensor("Berging sensor", None, None);
        bridge.set_group_on("Berging", true);

        assert_eq!(berging().sweep(&bridge, now()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn should_discover_rules_from_motion_links() {
        let bridge = FakeBridge {
            links: vec![
                MotionLink {
                    sensor: "Berging sensor".to_string(),
                    group: "Berging".to_string(),
                },
                MotionLink {
                    sensor: "Entree sensor".to_string(),
                    group: "Entree".to_string(),
                },
            ],
            ..FakeBridge::default()
        };
        let mut sweep = berging();

        assert_eq!(sweep.discover(&bridge, 600).await.unwrap(), 1);
        assert_eq!(sweep.rules().len(), 2);
        assert_eq!(sweep.rules()[0].timeout_secs, 120);
        assert_eq!(sweep.rules()[1], InactivityRule::new("Entree sensor", "Entree", 600));
    }

    #[tokio::test]
    async fn should_discover_one_rule_per_linked_group() {
        let link = |group: &str| MotionLink {
            sensor: "Entree sensor".to_string(),
            group: group.to_string(),
        };
        let bridge = FakeBridge {
            links: vec![link("Entree"), link("Hal"), link("Entree")],
            ..FakeBridge::default()
        };
        let mut sweep = InactivitySweep::new(Vec::new(), 3);

        assert_eq!(sweep.discover(&bridge, 600).await.unwrap(), 2);
        assert_eq!(
            sweep.rules(),
            [
                InactivityRule::new("Entree sensor", "Entree", 600),
                InactivityRule::new("Entree sensor", "Hal", 600),
            ]
        );
        assert_eq!(sweep.discover(&bridge, 600).await.unwrap(), 0);
    }
}
