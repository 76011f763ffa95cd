//! External process execution

pub mod command;
pub mod subprocess;

use async_trait::async_trait;
use thiserror::Error;

pub use command::CommandSpec;
pub use subprocess::ProcessExecutor;

/// Errors raised before an external process produces an exit status
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("{program}: command not found")]
    NotFound { program: String },

    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("failed to open {path}: {message}")]
    Redirect { path: String, message: String },
}

/// Outcome of one external invocation that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StageResult {
    /// Exit code; `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StageResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Trait for running external commands - allows for different implementations
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion and capture its output
    async fn execute(&self, spec: &CommandSpec) -> Result<StageResult, ExecutorError>;
}
