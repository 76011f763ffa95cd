//! Test: Failure Handling - the first failing stage aborts the run

use crate::helpers::*;
use analyzer::core::{PipelineError, RunState, Stage, StageState};
use analyzer::execution::{ExecutionEvent, RunOptions};
use std::path::Path;

fn config() -> analyzer::core::PipelineConfig {
    test_config(Path::new("/srv/analyzer"), "sample01")
}

/// A failed sort stops the run before indexing and variant calling
#[tokio::test]
async fn test_sort_failure_aborts_run() {
    let executor = MockExecutor::new().fail_on(
        "samtools sort",
        1,
        "[bam_sort_core] truncated file. Aborting.\n",
    );

    let result = run_with_mock(&executor, &config(), &request("pod5", None), RunOptions::default()).await;

    assert_aborted_at(&result, RunState::Sorting);
    assert_programs(&result, &["nvidia-smi", "dorado", "samtools"]);
    assert_not_invoked(&result, "samtools index");
    assert_not_invoked(&result, "sniffles");

    match result.error() {
        PipelineError::StageExecution {
            stage,
            exit_code,
            stderr,
            ..
        } => {
            assert_eq!(*stage, Stage::Sorting);
            assert_eq!(*exit_code, Some(1));
            assert!(stderr.contains("truncated file"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_stage_completed(&result, Stage::ConvertingToAlignment);
    assert!(matches!(
        result.stage_state(Stage::Sorting),
        Some(StageState::Failed { .. })
    ));
    assert_stage_skipped(&result, Stage::Indexing);
    assert_stage_skipped(&result, Stage::CallingVariants);
    assert_eq!(result.outcome.invoked_stages(), vec![Stage::ConvertingToAlignment, Stage::Sorting]);
}

/// Failed tool output still reaches event subscribers
#[tokio::test]
async fn test_failed_stage_output_is_surfaced() {
    let executor = MockExecutor::new().fail_on("sniffles", 2, "sniffles: error: no reads\n");

    let result = run_with_mock(&executor, &config(), &request("pod5", None), RunOptions::default()).await;

    assert_aborted_at(&result, RunState::CallingVariants);
    assert!(result.events.iter().any(|event| matches!(
        event,
        ExecutionEvent::StageOutput { stage: Stage::CallingVariants, stderr, .. }
            if stderr.contains("no reads")
    )));
    assert!(result.events.iter().any(|event| matches!(
        event,
        ExecutionEvent::StageFailed {
            stage: Stage::CallingVariants,
            ..
        }
    )));
    assert!(matches!(
        result.events.last(),
        Some(ExecutionEvent::RunFinished {
            state: RunState::Aborted,
            ..
        })
    ));
}

/// A missing tool fails its stage without an exit code
#[tokio::test]
async fn test_missing_basecaller() {
    let executor = MockExecutor::new().missing("dorado");

    let result = run_with_mock(&executor, &config(), &request("pod5", None), RunOptions::default()).await;

    assert_aborted_at(&result, RunState::ConvertingToAlignment);
    assert_programs(&result, &["nvidia-smi", "dorado"]);
    match result.error() {
        PipelineError::StageExecution {
            stage, exit_code, ..
        } => {
            assert_eq!(*stage, Stage::ConvertingToAlignment);
            assert_eq!(*exit_code, None);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_stage_skipped(&result, Stage::Sorting);
}

/// A failed legacy conversion never reaches the basecaller
#[tokio::test]
async fn test_legacy_conversion_failure() {
    let executor = MockExecutor::new().fail_on("pod5 convert", 1, "No fast5 files found\n");

    let result = run_with_mock(&executor, &config(), &request("fast5", None), RunOptions::default()).await;

    assert_aborted_at(&result, RunState::ConvertingLegacySignal);
    assert_programs(&result, &["nvidia-smi", "pod5"]);
    assert_stage_skipped(&result, Stage::ConvertingToAlignment);
}

/// Conversion that exits cleanly but leaves no output file is still a failure
#[tokio::test]
async fn test_missing_converted_file() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(temp.path(), "sample01");
    let executor = MockExecutor::new();

    let result = run_with_mock(&executor, &config, &request("fast5", None), RunOptions::default()).await;

    assert_aborted_at(&result, RunState::ConvertingLegacySignal);
    assert!(matches!(result.error(), PipelineError::Workspace(_)));
    assert_not_invoked(&result, "dorado");
}

/// Exit code 1 for every abort, whatever the stage
#[tokio::test]
async fn test_exit_code_for_each_failing_stage() {
    let cases = [
        ("dorado", RunState::ConvertingToAlignment),
        ("samtools sort", RunState::Sorting),
        ("samtools index", RunState::Indexing),
        ("sniffles", RunState::CallingVariants),
    ];

    for (prefix, state) in cases {
        let executor = MockExecutor::new().fail_on(prefix, 137, "Killed\n");
        let result = run_with_mock(&executor, &config(), &request("pod5", None), RunOptions::default()).await;

        assert_aborted_at(&result, state);
        assert!(result.error().to_string().contains("exit code 137"));
        assert!(result.error().to_string().ends_with("Killed"));
    }
}
