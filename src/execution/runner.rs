//! Stage runner - executes one external tool invocation for a stage

use crate::{
    core::{PipelineError, Stage},
    execution::events::{EventBus, ExecutionEvent},
    process::{CommandExecutor, CommandSpec, StageResult},
};
use tracing::{error, info};

/// Runs a single stage command and turns failure into a stage-scoped error
///
/// No retry and no cleanup of partial output.
pub struct StageRunner<'a, E: ?Sized> {
    executor: &'a E,
    events: &'a EventBus,
}

impl<'a, E: CommandExecutor + ?Sized> StageRunner<'a, E> {
    pub fn new(executor: &'a E, events: &'a EventBus) -> Self {
        Self { executor, events }
    }

    /// Execute `spec` for `stage`, blocking until the process exits
    pub async fn run(&self, stage: Stage, spec: &CommandSpec) -> Result<StageResult, PipelineError> {
        info!("[{}] {}", stage, spec);

        let result = match self.executor.execute(spec).await {
            Ok(result) => result,
            Err(e) => {
                error!("ERROR: {} could not be started: {}", stage, e);
                return Err(PipelineError::StageExecution {
                    stage,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: e.to_string(),
                });
            }
        };

        self.surface(stage, &result);

        if result.success() {
            Ok(result)
        } else {
            Err(PipelineError::StageExecution {
                stage,
                exit_code: result.exit_code,
                stdout: result.stdout,
                stderr: result.stderr,
            })
        }
    }

    /// Log captured output and hand it to event subscribers
    fn surface(&self, stage: Stage, result: &StageResult) {
        if result.success() {
            if !result.stdout.trim().is_empty() {
                info!("[{}] STDOUT: {}", stage, result.stdout.trim_end());
            }
            if !result.stderr.trim().is_empty() {
                info!("[{}] STDERR: {}", stage, result.stderr.trim_end());
            }
        } else {
            error!(
                "ERROR: {} exited with code {:?}",
                stage, result.exit_code
            );
            error!("STDOUT: {}", result.stdout.trim_end());
            error!("STDERR: {}", result.stderr.trim_end());
        }

        self.events.emit(ExecutionEvent::StageOutput {
            stage,
            stdout: result.stdout.clone(),
            stderr: result.stderr.clone(),
        });
    }
}
