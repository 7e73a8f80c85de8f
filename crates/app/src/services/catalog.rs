//! Cached hub config snapshot with lazy refresh on lookup misses.

use std::sync::Arc;

use arc_swap::ArcSwap;
use hometick_domain::activity::{ActivityId, ActivityLabel};
use hometick_domain::error::{ErrorChain, HubError, NotFoundError};
use hometick_domain::hub_config::HubConfig;

use crate::ports::RemoteHub;
use crate::retry::with_retry;

/// Holds the latest [`HubConfig`] snapshot.
///
/// Snapshots are never mutated: a refresh swaps in a new one, so readers
/// holding the previous snapshot keep a consistent view.
pub struct HubCatalog {
    snapshot: ArcSwap<HubConfig>,
    attempts: u32,
}

impl HubCatalog {
    #[must_use]
    pub fn new(attempts: u32) -> Self {
        Self::with_snapshot(HubConfig::default(), attempts)
    }

    #[must_use]
    pub fn with_snapshot(config: HubConfig, attempts: u32) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(config),
            attempts,
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<HubConfig> {
        self.snapshot.load_full()
    }

    /// Fetch a new snapshot from the hub and replace the current one.
    ///
    /// # Errors
    ///
    /// Returns the hub error once the retry attempts are exhausted; the
    /// previous snapshot is kept in that case.
    #[tracing::instrument(skip_all)]
    pub async fn refresh<H: RemoteHub>(&self, hub: &H) -> Result<(), HubError> {
        let config = with_retry("fetch hub config", self.attempts, || hub.fetch_config()).await?;
        tracing::debug!(
            activities = config.activities.len(),
            devices = config.devices.len(),
            "hub config refreshed"
        );
        self.snapshot.store(Arc::new(config));
        Ok(())
    }

    /// Resolve an activity id to its label.
    ///
    /// On a miss the snapshot is refreshed once and the lookup retried.
    /// Never fails: an id that stays unknown, or a failed refresh, yields
    /// [`ActivityLabel::unknown`].
    pub async fn resolve_label<H: RemoteHub>(&self, hub: &H, id: &ActivityId) -> ActivityLabel {
        if let Some(label) = self.snapshot.load().activity_label(id) {
            return label.clone();
        }
        if let Err(err) = self.refresh(hub).await {
            tracing::warn!(
                activity_id = %id,
                error = %ErrorChain(&err),
                "hub config refresh failed"
            );
            return ActivityLabel::unknown();
        }
        match self.snapshot.load().activity_label(id) {
            Some(label) => label.clone(),
            None => {
                tracing::debug!(activity_id = %id, "activity id not in hub config");
                ActivityLabel::unknown()
            }
        }
    }

    /// Find the id of an activity by label, refreshing once on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] if the label is still unknown after a
    /// refresh, or the hub error if the refresh fails.
    pub async fn activity_id<H: RemoteHub>(
        &self,
        hub: &H,
        label: &str,
    ) -> Result<ActivityId, HubError> {
        if let Some(id) = self.snapshot.load().activity_id(label) {
            return Ok(id.clone());
        }
        self.refresh(hub).await?;
        self.snapshot
            .load()
            .activity_id(label)
            .cloned()
            .ok_or_else(|| NotFoundError::new("activity", label).into())
    }

    /// Find the id of a hub device by label, refreshing once on a miss.
    ///
    /// # Errors
    ///
    /// Same as [`activity_id`](Self::activity_id).
    pub async fn device_id<H: RemoteHub>(&self, hub: &H, label: &str) -> Result<String, HubError> {
        if let Some(id) = self.snapshot.load().device_id(label) {
            return Ok(id.to_string());
        }
        self.refresh(hub).await?;
        self.snapshot
            .load()
            .device_id(label)
            .map(str::to_string)
            .ok_or_else(|| NotFoundError::new("device", label).into())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::testing::FakeHub;

    #[tokio::test]
    async fn should_refresh_once_on_miss_then_resolve() {
        let hub = FakeHub::new("200");
        let catalog = HubCatalog::new(3);

        let label = catalog.resolve_label(&hub, &"200".into()).await;
        assert_eq!(label, "Film");
        assert_eq!(hub.config_fetches.load(Ordering::SeqCst), 1);

        let label = catalog.resolve_label(&hub, &"200".into()).await;
        assert_eq!(label, "Film");
        assert_eq!(hub.config_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_yield_unknown_when_id_stays_unresolved() {
        let hub = FakeHub::new("999");
        let catalog = HubCatalog::new(3);
        let label = catalog.resolve_label(&hub, &"999".into()).await;
        assert!(label.is_unknown());
        assert_eq!(hub.config_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_yield_unknown_when_refresh_fails() {
        let hub = FakeHub::new("200");
        hub.fail_config.store(true, Ordering::SeqCst);
        let catalog = HubCatalog::new(3);
        let label = catalog.resolve_label(&hub, &"200".into()).await;
        assert!(label.is_unknown());
        assert_eq!(hub.config_fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn should_pick_up_new_activity_after_refresh() {
        let hub = FakeHub::new("100");
        let catalog = HubCatalog::new(3);
        catalog.refresh(&hub).await.unwrap();
        let before = catalog.snapshot();

        hub.add_activity("300", "Listen to Music");
        let label = catalog.resolve_label(&hub, &"300".into()).await;

        assert_eq!(label, "Listen to Music");
        assert!(before.activity_label(&"300".into()).is_none());
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device() {
        let hub = FakeHub::new("100");
        let catalog = HubCatalog::new(3);
        assert_eq!(catalog.device_id(&hub, "Aten AV Switch").await.unwrap(), "42");
        let err = catalog.device_id(&hub, "Amplifier").await.unwrap_err();
        assert!(matches!(err, HubError::NotFound(_)));
    }

    #[tokio::test]
    async fn should_find_activity_id_by_label() {
        let hub = FakeHub::new("100");
        let catalog = HubCatalog::new(3);
        let id = catalog.activity_id(&hub, "Film").await.unwrap();
        assert_eq!(id.as_str(), "200");
    }
}
