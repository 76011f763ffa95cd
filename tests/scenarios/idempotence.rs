//! Test: Idempotence - re-runs target the same paths, workspace reset clears prior output

use crate::helpers::*;
use analyzer::core::{Artifact, FileType, RunState};
use analyzer::execution::{PipelineOrchestrator, RunOptions};
use analyzer::process::{CommandExecutor, CommandSpec, ExecutorError, StageResult};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

/// Writes the VCF the way sniffles does, refusing an existing one
/// unless `--allow-overwrite` is passed
#[derive(Clone, Default)]
struct VariantCallerLike {
    inner: MockExecutor,
}

#[async_trait]
impl CommandExecutor for VariantCallerLike {
    async fn execute(&self, spec: &CommandSpec) -> Result<StageResult, ExecutorError> {
        let result = self.inner.execute(spec).await?;
        if spec.program() != "sniffles" {
            return Ok(result);
        }

        let args = spec.args_lossy();
        let vcf = args
            .iter()
            .position(|arg| arg == "-v")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
            .unwrap();
        if vcf.exists() && !args.iter().any(|arg| arg == "--allow-overwrite") {
            return Ok(StageResult::failed(
                1,
                format!("Error: output file {} already exists", vcf.display()),
            ));
        }
        fs::create_dir_all(vcf.parent().unwrap()).unwrap();
        fs::write(&vcf, b"##fileformat=VCFv4.2\n").unwrap();
        Ok(result)
    }
}

/// A second run over the same sample replaces the first run's VCF
#[tokio::test]
async fn test_rerun_overwrites_existing_variant_calls() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(temp.path(), "sample01");
    let executor = VariantCallerLike::default();
    let orchestrator = PipelineOrchestrator::new(executor.clone());

    let first = orchestrator.run(&config, &request("pod5", None)).await;
    assert!(first.is_done(), "{:?}", first.error);
    assert!(config.path(Artifact::VariantCalls).is_file());

    let second = orchestrator.run(&config, &request("pod5", None)).await;
    assert!(second.is_done(), "{:?}", second.error);
    assert_eq!(second.exit_code(), 0);
}

#[tokio::test]
async fn test_rerun_issues_identical_commands() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(temp.path(), "sample01");

    let first = MockExecutor::new();
    let first = run_with_mock(&first, &config, &request("pod5", None), RunOptions::default()).await;
    let second = MockExecutor::new();
    let second = run_with_mock(&second, &config, &request("pod5", None), RunOptions::default()).await;

    assert_run_done(&first);
    assert_run_done(&second);
    assert_eq!(first.command_lines, second.command_lines);
    assert_ne!(first.outcome.run_id, second.outcome.run_id);
}

#[tokio::test]
async fn test_clear_workspace_before_first_stage() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(temp.path(), "sample01");

    for dir in config.clearable_dirs() {
        fs::create_dir_all(&dir).unwrap();
    }
    fs::write(config.path(Artifact::Alignment), b"stale").unwrap();
    fs::write(config.path(Artifact::SortedAlignment), b"stale").unwrap();
    fs::write(config.path(Artifact::VariantCalls), b"stale").unwrap();
    fs::write(config.raw_signal_dir(FileType::Pod5).join("old.pod5"), b"stale").unwrap();
    fs::write(config.logs_dir().join("run.log"), b"stale").unwrap();
    fs::create_dir_all(config.reference_dir()).unwrap();
    fs::write(config.path(Artifact::Reference), b"reference").unwrap();

    let executor = MockExecutor::new();
    let result = run_with_mock(
        &executor,
        &config,
        &request("pod5", None),
        RunOptions {
            enable_staging: false,
            clear_workspace: true,
        },
    )
    .await;

    assert_run_done(&result);
    assert!(!config.path(Artifact::Alignment).exists());
    assert!(!config.path(Artifact::SortedAlignment).exists());
    assert!(!config.path(Artifact::VariantCalls).exists());
    assert!(!config.raw_signal_dir(FileType::Pod5).join("old.pod5").exists());
    assert!(!config.logs_dir().join("run.log").exists());
    assert!(config.path(Artifact::Reference).exists());
    assert!(config.alignment_dir().is_dir());
}

/// Validation runs before the reset, so a bad request deletes nothing
#[tokio::test]
async fn test_invalid_request_keeps_workspace() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(temp.path(), "sample01");
    fs::create_dir_all(config.alignment_dir()).unwrap();
    fs::write(config.path(Artifact::Alignment), b"keep").unwrap();

    let executor = MockExecutor::new();
    let result = run_with_mock(
        &executor,
        &config,
        &request("pod5", Some("not-a-model")),
        RunOptions {
            enable_staging: false,
            clear_workspace: true,
        },
    )
    .await;

    assert_aborted_at(&result, RunState::Validating);
    assert!(config.path(Artifact::Alignment).exists());
}
