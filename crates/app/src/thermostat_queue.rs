//! Bounded thermostat command queue served by a single worker task.
//!
//! Thermostat calls go through an external process and can take seconds,
//! so the poll loop only enqueues. Commands run in submission order.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hometick_domain::action::ThermostatCommand;
use hometick_domain::error::{ErrorChain, HubError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ports::Thermostat;

const QUEUE_NAME: &str = "thermostat";

/// Counters describing the queue, readable at any time.
#[derive(Debug, Default)]
pub struct QueueStats {
    pending: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

/// Point-in-time copy of [`QueueStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSnapshot {
    /// Submitted but not yet finished (queued or running).
    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
}

impl QueueStats {
    #[must_use]
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            pending: self.pending.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

/// Submission handle of the queue.
#[derive(Clone)]
pub struct ThermostatQueue {
    sender: mpsc::Sender<ThermostatCommand>,
    stats: Arc<QueueStats>,
}

/// Handle on the worker task, used to wait for queued work on shutdown.
pub struct ThermostatWorker {
    handle: JoinHandle<()>,
}

impl ThermostatQueue {
    /// Spawn the worker on the current runtime and return both handles.
    ///
    /// The worker exits once every [`ThermostatQueue`] clone is dropped and
    /// the remaining commands have run.
    pub fn spawn<T>(thermostat: T, capacity: usize) -> (Self, ThermostatWorker)
    where
        T: Thermostat + 'static,
    {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let stats = Arc::new(QueueStats::default());
        let handle = tokio::spawn(run_worker(thermostat, receiver, Arc::clone(&stats)));
        (Self { sender, stats }, ThermostatWorker { handle })
    }

    /// Enqueue a command without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::QueueFull`] at capacity and
    /// [`HubError::QueueClosed`] if the worker has stopped.
    pub fn submit(&self, command: ThermostatCommand) -> Result<(), HubError> {
        self.stats.pending.fetch_add(1, Ordering::SeqCst);
        match self.sender.try_send(command) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.stats.pending.fetch_sub(1, Ordering::SeqCst);
                Err(match err {
                    mpsc::error::TrySendError::Full(_) => HubError::QueueFull(QUEUE_NAME),
                    mpsc::error::TrySendError::Closed(_) => HubError::QueueClosed(QUEUE_NAME),
                })
            }
        }
    }

    #[must_use]
    pub fn stats(&self) -> QueueSnapshot {
        self.stats.snapshot()
    }
}

impl ThermostatWorker {
    /// Wait up to `grace` for the worker to drain the queue.
    ///
    /// Returns `false` if the worker was still busy and got aborted.
    pub async fn finish(self, grace: Duration) -> bool {
        let abort = self.handle.abort_handle();
        match tokio::time::timeout(grace, self.handle).await {
            Ok(_) => true,
            Err(_) => {
                tracing::warn!(?grace, "thermostat worker still busy, aborting");
                abort.abort();
                false
            }
        }
    }
}

async fn run_worker<T: Thermostat>(
    thermostat: T,
    mut receiver: mpsc::Receiver<ThermostatCommand>,
    stats: Arc<QueueStats>,
) {
    while let Some(command) = receiver.recv().await {
        match thermostat.apply(&command).await {
            Ok(()) => {
                tracing::info!(%command, "thermostat command applied");
                stats.completed.fetch_add(1, Ordering::SeqCst);
            }
            Err(err) => {
                tracing::warn!(%command, error = %ErrorChain(&err), "thermostat command failed");
                stats.failed.fetch_add(1, Ordering::SeqCst);
            }
        }
        stats.pending.fetch_sub(1, Ordering::SeqCst);
    }
    tracing::debug!("thermostat worker stopped");
}
