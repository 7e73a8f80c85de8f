//! Light-linked plugs: switch a smart plug when its linked light changes.

use hometick_domain::error::ErrorChain;
use hometick_domain::plug_link::PlugLink;
use hometick_domain::power::PowerState;

use crate::ports::{LightingBridge, SmartPlugs};

struct LinkState {
    link: PlugLink,
    /// Light state seen by the previous check; `None` until the first one.
    last_light: Option<PowerState>,
    reachable: bool,
}

pub struct PlugLinker {
    links: Vec<LinkState>,
}

impl PlugLinker {
    #[must_use]
    pub fn new(links: Vec<PlugLink>) -> Self {
        Self {
            links: links
                .into_iter()
                .map(|link| LinkState {
                    link,
                    last_light: None,
                    reachable: true,
                })
                .collect(),
        }
    }

    /// Check every link once. The first observation of a light only sets
    /// the baseline; after that the plug is switched when the light changes
    /// and the plug is not already in the wanted state.
    ///
    /// Failures never escape: an unreachable plug or unreadable light skips
    /// that link until the next check.
    ///
    /// Returns the number of plugs switched.
    pub async fn check_all<L, P>(&mut self, bridge: &L, plugs: &P) -> usize
    where
        L: LightingBridge,
        P: SmartPlugs,
    {
        let mut switched = 0;
        for state in &mut self.links {
            if check_link(state, bridge, plugs).await {
                switched += 1;
            }
        }
        switched
    }
}

async fn check_link<L, P>(state: &mut LinkState, bridge: &L, plugs: &P) -> bool
where
    L: LightingBridge,
    P: SmartPlugs,
{
    let plug = state.link.plug.as_str();
    let light = state.link.light.as_str();

    let reachable = plugs.is_reachable(plug).await;
    if reachable != state.reachable {
        if reachable {
            tracing::info!(plug, light, "plug came back online, linking");
        } else {
            tracing::info!(plug, light, "plug unreachable, not able to link");
        }
        state.reachable = reachable;
    }
    if !reachable {
        return false;
    }

    let (current, reading) = match (plugs.power(plug).await, bridge.light(light).await) {
        (Ok(current), Ok(reading)) => (current, reading),
        (Err(err), _) | (_, Err(err)) => {
            tracing::info!(plug, light, error = %ErrorChain(&err), "plug link check failed");
            return false;
        }
    };
    let desired = state.link.desired(reading);
    let previous = state.last_light.replace(desired);
    if previous.is_none_or(|previous| previous == desired) {
        return false;
    }

    tracing::info!(light, plug, %desired, "light switched state");
    if current == desired {
        return false;
    }
    match plugs.set_power(plug, desired).await {
        Ok(()) => {
            tracing::info!(plug, light, %desired, "plug switched to match light");
            true
        }
        Err(err) => {
            tracing::warn!(plug, error = %ErrorChain(&err), "switching linked plug failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::testing::{FakeBridge, FakePlugs};

    fn linker() -> PlugLinker {
        PlugLinker::new(vec![PlugLink::new("lamp", "Staande lamp")])
    }

    #[tokio::test]
    async fn should_only_record_baseline_on_first_check() {
        let bridge = FakeBridge::default();
        bridge.set_light("Staande lamp", true, 200);
        let plugs = FakePlugs::with("lamp", PowerState::Off);
        let mut linker = linker();

        assert_eq!(linker.check_all(&bridge, &plugs).await, 0);
        assert!(plugs.switches().is_empty());
    }

    #[tokio::test]
    async fn should_follow_light_changes() {
        let bridge = FakeBridge::default();
        bridge.set_light("Staande lamp", false, 200);
        let plugs = FakePlugs::with("lamp", PowerState::Off);
        let mut linker = linker();
        linker.check_all(&bridge, &plugs).await;

        bridge.set_light("Staande lamp", true, 200);
        assert_eq!(linker.check_all(&bridge, &plugs).await, 1);
        assert_eq!(plugs.state("lamp"), Some(PowerState::On));

        assert_eq!(linker.check_all(&bridge, &plugs).await, 0);

        bridge.set_light("Staande lamp", true, 10);
        assert_eq!(linker.check_all(&bridge, &plugs).await, 1);
        assert_eq!(plugs.switches(), vec!["lamp on", "lamp off"]);
    }

    #[tokio::test]
    async fn should_not_switch_plug_already_matching() {
        let bridge = FakeBridge::default();
        bridge.set_light("Staande lamp", false, 0);
        let plugs = FakePlugs::with("lamp", PowerState::On);
        let mut linker = linker();
        linker.check_all(&bridge, &plugs).await;

        bridge.set_light("Staande lamp", true, 254);
        assert_eq!(linker.check_all(&bridge, &plugs).await, 0);
        assert!(plugs.switches().is_empty());
    }

    #[tokio::test]
    async fn should_skip_unreachable_plug() {
        let bridge = FakeBridge::default();
        bridge.set_light("Staande lamp", false, 0);
        let plugs = FakePlugs::with("lamp", PowerState::Off);
        let mut linker = linker();
        linker.check_all(&bridge, &plugs).await;

        plugs.unreachable.lock().unwrap().insert("lamp".to_string());
        bridge.set_light("Staande lamp", true, 254);
        assert_eq!(linker.check_all(&bridge, &plugs).await, 0);

        plugs.unreachable.lock().unwrap().clear();
        assert_eq!(linker.check_all(&bridge, &plugs).await, 1);
    }

    #[tokio::test]
    async fn should_skip_check_when_light_unreadable() {
        let bridge = FakeBridge::default();
        bridge.failing_lights.store(true, Ordering::SeqCst);
        let plugs = FakePlugs::with("lamp", PowerState::Off);
        let mut linker = linker();

        assert_eq!(linker.check_all(&bridge, &plugs).await, 0);
        assert!(plugs.switches().is_empty());
    }
}
