//! Bounded retry for device calls.

use std::future::Future;

use hometick_domain::error::{ErrorChain, HubError};

/// Total attempts per device call: one try plus two retries.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Run `op` up to `attempts` times (at least once), without backoff.
///
/// Only transient errors (see [`HubError::is_transient`]) are retried; the
/// last error is returned once the attempts are exhausted.
///
/// # Errors
///
/// Returns the error of the final attempt, or the first non-transient error.
pub async fn with_retry<T, F, Fut>(what: &str, attempts: u32, mut op: F) -> Result<T, HubError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, HubError>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < attempts => {
                tracing::info!(
                    operation = what,
                    attempt,
                    error = %ErrorChain(&err),
                    "device call failed, retrying"
                );
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
