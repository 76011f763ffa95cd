//! Test utility functions for analyzer scenarios

#![allow(dead_code)]

use analyzer::core::{
    Deployment, PipelineConfig, PipelineError, RunOutcome, RunState, SampleId, Stage, StageState,
};
use analyzer::execution::{ExecutionEvent, PipelineOrchestrator, RunOptions, RunRequest};
use analyzer::process::{CommandExecutor, CommandSpec, ExecutorError, StageResult};
use analyzer::transfer::{AwsCliTransfer, Credentials};

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Reply {
    Result(StageResult),
    Error(ExecutorError),
}

/// Mock executor that records every command and answers by command-line prefix
///
/// Commands without a configured reply succeed with empty output.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    calls: Arc<Mutex<Vec<CommandSpec>>>,
    replies: Arc<Mutex<Vec<(String, Reply)>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `result`
    pub fn reply(self, prefix: &str, result: StageResult) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push((prefix.to_string(), Reply::Result(result)));
        self
    }

    /// Report these device names from the GPU inventory query
    pub fn with_gpu(self, device_names: &str) -> Self {
        self.reply("nvidia-smi", StageResult::ok(device_names))
    }

    pub fn fail_on(self, prefix: &str, exit_code: i32, stderr: &str) -> Self {
        self.reply(prefix, StageResult::failed(exit_code, stderr))
    }

    /// Behave as if `program` is not installed
    pub fn missing(self, program: &str) -> Self {
        self.replies.lock().unwrap().push((
            program.to_string(),
            Reply::Error(ExecutorError::NotFound {
                program: program.to_string(),
            }),
        ));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|spec| spec.program().to_string())
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn execute(&self, spec: &CommandSpec) -> Result<StageResult, ExecutorError> {
        self.calls.lock().unwrap().push(spec.clone());

        let line = spec.to_string();
        let reply = self
            .replies
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Result(result)) => Ok(result),
            Some(Reply::Error(e)) => Err(e),
            None => Ok(StageResult::ok("")),
        }
    }
}

/// A complete key pair from the environment
pub fn test_credentials() -> Credentials {
    Credentials {
        access_key_id: Some("AKIDEXAMPLE".to_string()),
        secret_access_key: Some("secret".to_string()),
    }
}

/// Production-layout config rooted in a scratch directory
pub fn test_config(root: &Path, sample: &str) -> PipelineConfig {
    PipelineConfig::for_deployment(Deployment::Production, SampleId::new(sample).unwrap())
        .with_base_dir(root)
}

pub fn request(file_type: &str, model: Option<&str>) -> RunRequest {
    RunRequest {
        model_name: model.map(str::to_string),
        file_type: file_type.to_string(),
        bucket_name: None,
    }
}

/// Run the pipeline against a mock executor
pub async fn run_with_mock(
    executor: &MockExecutor,
    config: &PipelineConfig,
    request: &RunRequest,
    options: RunOptions,
) -> ScenarioResult {
    let orchestrator = PipelineOrchestrator::new(executor.clone()).with_options(options);
    run_orchestrator(orchestrator, executor, config, request).await
}

/// Run the pipeline with staging through the AWS CLI transfer on the same mock
pub async fn run_with_staging(
    executor: &MockExecutor,
    config: &PipelineConfig,
    request: &RunRequest,
    credentials: Credentials,
) -> ScenarioResult {
    let orchestrator = PipelineOrchestrator::new(executor.clone())
        .with_options(RunOptions {
            enable_staging: true,
            clear_workspace: false,
        })
        .with_transfer(AwsCliTransfer::new(executor.clone()).with_credentials(credentials));
    run_orchestrator(orchestrator, executor, config, request).await
}

async fn run_orchestrator(
    mut orchestrator: PipelineOrchestrator<MockExecutor>,
    executor: &MockExecutor,
    config: &PipelineConfig,
    request: &RunRequest,
) -> ScenarioResult {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    orchestrator.add_event_handler(move |event| sink.lock().unwrap().push(event));

    let outcome = orchestrator.run(config, request).await;
    let events = events.lock().unwrap().clone();

    ScenarioResult {
        outcome,
        events,
        command_lines: executor.command_lines(),
        programs: executor.programs(),
    }
}

/// Everything a scenario can assert on
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub outcome: RunOutcome,
    pub events: Vec<ExecutionEvent>,
    pub command_lines: Vec<String>,
    pub programs: Vec<String>,
}

impl ScenarioResult {
    pub fn stage_state(&self, stage: Stage) -> Option<&StageState> {
        self.outcome.stage(stage).map(|record| &record.state)
    }

    pub fn error(&self) -> &PipelineError {
        self.outcome
            .error
            .as_ref()
            .expect("run finished without an error")
    }

    /// The command line that started with `prefix`
    pub fn command(&self, prefix: &str) -> Option<&String> {
        self.command_lines
            .iter()
            .find(|line| line.starts_with(prefix))
    }

    pub fn summary(&self) -> String {
        format!(
            "state={} aborted_at={:?} calls={:#?}",
            self.outcome.state.as_str(),
            self.outcome.aborted_at,
            self.command_lines
        )
    }
}

/// Assert that the run finished successfully
pub fn assert_run_done(result: &ScenarioResult) {
    assert!(
        result.outcome.is_done(),
        "Expected run to be done, got: {}",
        result.summary()
    );
    assert_eq!(result.outcome.exit_code(), 0);
    assert!(result.outcome.error.is_none());
}

/// Assert that the run aborted while in `state`
pub fn assert_aborted_at(result: &ScenarioResult, state: RunState) {
    assert_eq!(
        result.outcome.state,
        RunState::Aborted,
        "Expected run to abort, got: {}",
        result.summary()
    );
    assert_eq!(result.outcome.aborted_at, Some(state), "{}", result.summary());
    assert_eq!(result.outcome.exit_code(), 1);
}

/// Assert the exact programs invoked, in order
pub fn assert_programs(result: &ScenarioResult, expected: &[&str]) {
    assert_eq!(result.programs, expected, "{}", result.summary());
}

/// Assert that no command line starts with `prefix`
pub fn assert_not_invoked(result: &ScenarioResult, prefix: &str) {
    assert!(
        result.command(prefix).is_none(),
        "Expected '{}' not to run: {}",
        prefix,
        result.summary()
    );
}

pub fn assert_stage_skipped(result: &ScenarioResult, stage: Stage) {
    assert!(
        matches!(result.stage_state(stage), Some(StageState::Skipped { .. })),
        "Expected {} to be skipped, got {:?}",
        stage,
        result.stage_state(stage)
    );
}

pub fn assert_stage_completed(result: &ScenarioResult, stage: Stage) {
    assert!(
        matches!(result.stage_state(stage), Some(StageState::Completed { .. })),
        "Expected {} to be completed, got {:?}",
        stage,
        result.stage_state(stage)
    );
}
