//! Error types for pipeline runs

use crate::core::stage::Stage;
use thiserror::Error;

/// Errors that end a pipeline run
///
/// Every variant is fatal for the run. There is no recovery path: the
/// orchestrator records the error and stops, and the process exits non-zero.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Unrecognized environment, missing arguments, unknown model, missing credentials
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An external tool exited non-zero or could not be started
    #[error("{stage} failed ({}): {}", format_exit(.exit_code), last_line(.stderr))]
    StageExecution {
        stage: Stage,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Object-storage operation failed
    #[error("transfer error: {0}")]
    Transfer(String),

    /// Local artifact housekeeping failed
    #[error("workspace error: {0}")]
    Workspace(String),
}

impl PipelineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn transfer(message: impl Into<String>) -> Self {
        Self::Transfer(message.into())
    }

    pub fn workspace(message: impl Into<String>) -> Self {
        Self::Workspace(message.into())
    }

    /// Short machine-readable kind, used in run reports
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "configuration",
            PipelineError::StageExecution { .. } => "stage_execution",
            PipelineError::Transfer(_) => "transfer",
            PipelineError::Workspace(_) => "workspace",
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, PipelineError::Configuration(_))
    }
}

fn format_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}

fn last_line(text: &str) -> &str {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no output")
}
