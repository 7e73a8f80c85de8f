//! Inbound command inbox.
//!
//! The HTTP listener only enqueues payloads through a [`CommandSender`];
//! the poll loop drains the [`CommandInbox`] once per iteration, so
//! payloads are handled strictly one at a time. Topics within a payload
//! are handled in the order the request lists them.

use hometick_domain::error::{ErrorChain, HubError};
use hometick_domain::topic::TopicTable;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::executor::{ActionExecutor, execute_all};

const QUEUE_NAME: &str = "inbox";

/// A decoded inbound request: `topic -> value`.
pub type Payload = Map<String, Value>;

/// Create a bounded inbox and its sending half.
#[must_use]
pub fn channel(topics: TopicTable, capacity: usize) -> (CommandSender, CommandInbox) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (CommandSender { sender }, CommandInbox { receiver, topics })
}

/// Cloneable enqueue handle, given to the inbound listener.
#[derive(Debug, Clone)]
pub struct CommandSender {
    sender: mpsc::Sender<Payload>,
}

impl CommandSender {
    /// Enqueue a payload without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::QueueFull`] at capacity and
    /// [`HubError::QueueClosed`] once the inbox is gone.
    pub fn submit(&self, payload: Payload) -> Result<(), HubError> {
        self.sender.try_send(payload).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => HubError::QueueFull(QUEUE_NAME),
            mpsc::error::TrySendError::Closed(_) => HubError::QueueClosed(QUEUE_NAME),
        })
    }
}

/// Per-drain counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub payloads: usize,
    /// Registered topics whose actions all ran.
    pub handled: usize,
    /// Registered topics whose value was rejected or whose actions failed.
    pub failed: usize,
}

pub struct CommandInbox {
    receiver: mpsc::Receiver<Payload>,
    topics: TopicTable,
}

impl CommandInbox {
    /// Handle every queued payload, without waiting for new ones.
    pub async fn drain<E: ActionExecutor>(&mut self, executor: &E) -> DrainReport {
        let mut report = DrainReport::default();
        while let Ok(payload) = self.receiver.try_recv() {
            report.payloads += 1;
            handle(&self.topics, &payload, executor, &mut report).await;
        }
        report
    }
}

async fn handle<E: ActionExecutor>(
    topics: &TopicTable,
    payload: &Payload,
    executor: &E,
    report: &mut DrainReport,
) {
    for (topic, value) in payload {
        let topic = topic.as_str();
        let Some(handler) = topics.handler(topic) else {
            tracing::debug!(topic, "ignoring unregistered topic");
            continue;
        };
        tracing::info!(topic, %value, "inbound command");
        let result = match handler.actions_for(topic, value) {
            Ok(actions) => execute_all(executor, &actions).await,
            Err(err) => Err(err.into()),
        };
        match result {
            Ok(()) => report.handled += 1,
            Err(err) => {
                tracing::warn!(topic, error = %ErrorChain(&err), "topic handler failed");
                report.failed += 1;
            }
        }
    }
}
