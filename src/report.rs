//! JSON run reports

use crate::core::{ExecutionPath, PipelineError, RunOutcome, RunState, StageRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Serializable summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique run ID
    pub run_id: Uuid,

    pub sample: String,

    pub model: Option<String>,

    pub execution_path: Option<ExecutionPath>,

    /// Final state (`done` or `aborted`)
    pub state: RunState,

    /// Where the run stopped, if it aborted
    pub aborted_at: Option<RunState>,

    pub error: Option<ErrorSummary>,

    pub stages: Vec<StageRecord>,

    pub started_at: DateTime<Utc>,

    pub finished_at: Option<DateTime<Utc>>,

    /// Fraction of planned stages that completed (0.0 to 1.0)
    pub progress: f64,

    pub exit_code: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub kind: String,
    pub message: String,
}

/// Create a summary from a run outcome
pub fn create_summary(outcome: &RunOutcome) -> RunSummary {
    RunSummary {
        run_id: outcome.run_id,
        sample: outcome.sample.to_string(),
        model: outcome.model.as_ref().map(ToString::to_string),
        execution_path: outcome.execution_path,
        state: outcome.state,
        aborted_at: outcome.aborted_at,
        error: outcome.error.as_ref().map(|e| ErrorSummary {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }),
        stages: outcome.stages.clone(),
        started_at: outcome.started_at,
        finished_at: outcome.finished_at,
        progress: outcome.progress(),
        exit_code: outcome.exit_code(),
    }
}

/// Summary for a run refused before the orchestrator was built,
/// e.g. when no workspace could be derived for the sample
pub fn rejected_summary(sample: &str, error: &PipelineError) -> RunSummary {
    let now = Utc::now();
    RunSummary {
        run_id: Uuid::new_v4(),
        sample: sample.to_string(),
        model: None,
        execution_path: None,
        state: RunState::Aborted,
        aborted_at: Some(RunState::Validating),
        error: Some(ErrorSummary {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }),
        stages: Vec::new(),
        started_at: now,
        finished_at: Some(now),
        progress: 0.0,
        exit_code: 1,
    }
}

/// Write the summary as pretty JSON
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write run report to {}", path.display()))
}
