//! Debounced button poller.
//!
//! The lighting bridge only exposes the last button event of each switch
//! and when it happened. A press is new when that timestamp strictly
//! advances past the last one dispatched.

use hometick_domain::button::ButtonMap;
use hometick_domain::error::{ErrorChain, HubError};
use hometick_domain::sensor::ButtonPress;
use hometick_domain::time::Timestamp;

use crate::executor::{ActionExecutor, execute_all};
use crate::ports::LightingBridge;
use crate::retry::with_retry;

pub struct ButtonPoller {
    map: ButtonMap,
    /// Tracked sensors in table order, with the last dispatched update time.
    last_dispatched: Vec<(String, Timestamp)>,
    attempts: u32,
}

impl ButtonPoller {
    /// Track every sensor of `map`, ignoring presses at or before `started_at`.
    #[must_use]
    pub fn new(map: ButtonMap, started_at: Timestamp, attempts: u32) -> Self {
        let last_dispatched = map
            .sensors()
            .into_iter()
            .map(|sensor| (sensor.to_string(), started_at))
            .collect();
        Self {
            map,
            last_dispatched,
            attempts,
        }
    }

    /// Check every tracked sensor and run the mapped actions of new presses.
    ///
    /// Returns the number of presses dispatched. Action failures are logged
    /// and do not stop the remaining sensors from being checked.
    ///
    /// # Errors
    ///
    /// Returns the bridge error if a sensor cannot be read.
    #[tracing::instrument(skip_all)]
    pub async fn check_all<L, E>(&mut self, bridge: &L, executor: &E) -> Result<usize, HubError>
    where
        L: LightingBridge,
        E: ActionExecutor,
    {
        let mut dispatched = 0;
        for (sensor, last) in &mut self.last_dispatched {
            let sensor = sensor.as_str();
            let reading = with_retry("read sensor", self.attempts, || bridge.sensor(sensor)).await?;
            let Some(updated) = reading.last_updated else {
                continue;
            };
            if updated <= *last {
                continue;
            }
            *last = updated;

            let press = ButtonPress {
                sensor: sensor.to_string(),
                button: reading.button_event,
            };
            tracing::info!(sensor, button = ?press.button, "button pressed");
            dispatched += 1;

            let actions = self.map.actions_for(&press);
            if let Err(err) = execute_all(executor, &actions).await {
                tracing::warn!(sensor, error = %ErrorChain(&err), "button action failed");
            }
        }
        Ok(dispatched)
    }
}
