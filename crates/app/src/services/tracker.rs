//! Activity state tracker: polls the remote hub and detects changes.

use hometick_domain::activity::{ActivityLabel, Transition};
use hometick_domain::error::HubError;

use crate::ports::RemoteHub;
use crate::retry::with_retry;
use crate::services::catalog::HubCatalog;

/// Remembers the last resolved activity label.
pub struct ActivityTracker {
    last: Option<ActivityLabel>,
    attempts: u32,
}

impl ActivityTracker {
    #[must_use]
    pub fn new(attempts: u32) -> Self {
        Self {
            last: None,
            attempts,
        }
    }

    /// The label stored by the last poll, if any.
    #[must_use]
    pub fn current(&self) -> Option<&ActivityLabel> {
        self.last.as_ref()
    }

    /// Poll the hub and report a transition if the label changed.
    ///
    /// The stored label is updated on every successful poll.
    ///
    /// # Errors
    ///
    /// Returns the hub error once the retry attempts are exhausted. Label
    /// resolution itself never fails.
    #[tracing::instrument(skip_all)]
    pub async fn poll<H: RemoteHub>(
        &mut self,
        hub: &H,
        catalog: &HubCatalog,
    ) -> Result<Option<Transition>, HubError> {
        let id = with_retry("current activity", self.attempts, || {
            hub.current_activity_id()
        })
        .await?;
        let label = catalog.resolve_label(hub, &id).await;
        tracing::debug!(activity_id = %id, activity = %label, "polled hub activity");

        if self.last.as_ref() == Some(&label) {
            return Ok(None);
        }
        let transition = Transition::new(self.last.replace(label.clone()), label);
        Ok(Some(transition))
    }

    /// Poll once to establish the baseline, without reporting a transition.
    ///
    /// # Errors
    ///
    /// Same as [`poll`](Self::poll).
    pub async fn prime<H: RemoteHub>(
        &mut self,
        hub: &H,
        catalog: &HubCatalog,
    ) -> Result<&ActivityLabel, HubError> {
        self.poll(hub, catalog).await?;
        let label = self.last.get_or_insert_with(ActivityLabel::unknown);
        tracing::info!(activity = %label, "initial hub activity");
        Ok(label)
    }
}
