//! Running external programs with a timeout.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::error::CliError;

/// Run `program` with `args` and wait for it, killing it after `limit`.
pub(crate) async fn run(
    program: &str,
    args: &[String],
    limit: Duration,
) -> Result<Output, CliError> {
    let mut command = Command::new(program);
    command.args(args).stdin(Stdio::null()).kill_on_drop(true);
    timeout(limit, command.output())
        .await
        .map_err(|_| CliError::Timeout {
            program: program.to_string(),
        })?
        .map_err(|source| CliError::Spawn {
            program: program.to_string(),
            source,
        })
}

/// Like [`run`], but a non-zero exit status is an error.
pub(crate) async fn run_checked(
    program: &str,
    args: &[String],
    limit: Duration,
) -> Result<(), CliError> {
    let output = run(program, args, limit).await?;
    if output.status.success() {
        return Ok(());
    }
    Err(CliError::Failed {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
