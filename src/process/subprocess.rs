//! Subprocess executor backed by tokio::process

use crate::process::{CommandExecutor, CommandSpec, ExecutorError, StageResult};
use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs commands as child processes and waits for them to exit
///
/// There is no timeout: a hung tool blocks the caller until it exits.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, spec: &CommandSpec) -> Result<StageResult, ExecutorError> {
        debug!("Spawning subprocess: {}", spec);

        let mut command = Command::new(spec.program());
        command
            .args(spec.get_args())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // Redirected output is truncated on every run, so re-runs overwrite
        if let Some(path) = spec.stdout_path() {
            let file = std::fs::File::create(path).map_err(|e| ExecutorError::Redirect {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            command.stdout(Stdio::from(file));
        }

        let output = command.output().await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ExecutorError::NotFound {
                program: spec.program().to_string(),
            },
            _ => ExecutorError::Spawn {
                program: spec.program().to_string(),
                message: e.to_string(),
            },
        })?;

        let result = StageResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            warn!(
                "{} exited with code {:?}: {}",
                spec.program(),
                result.exit_code,
                result.stderr.trim()
            );
        }

        debug!(
            "{} returned {} bytes of stdout, {} bytes of stderr",
            spec.program(),
            result.stdout.len(),
            result.stderr.len()
        );

        Ok(result)
    }
}
