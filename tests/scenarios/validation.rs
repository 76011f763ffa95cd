//! Test: Validation - bad input stops the run before any process starts

use crate::helpers::*;
use analyzer::core::{ModelCatalog, RunState};
use analyzer::execution::RunOptions;
use std::path::Path;

fn config() -> analyzer::core::PipelineConfig {
    test_config(Path::new("/srv/analyzer"), "sample01")
}

#[tokio::test]
async fn test_unknown_model_invokes_nothing() {
    let executor = MockExecutor::new();

    let result = run_with_mock(
        &executor,
        &config(),
        &request("pod5", Some("dna_r10.4.1_e8.2_400bps_sup@v9.9.9")),
        RunOptions::default(),
    )
    .await;

    assert_aborted_at(&result, RunState::Validating);
    assert!(result.error().is_configuration());
    assert!(result.command_lines.is_empty(), "{}", result.summary());
    assert!(result.outcome.stages.is_empty());
    assert!(result.outcome.execution_path.is_none());
}

/// Model names match exactly, including case
#[tokio::test]
async fn test_model_name_is_case_sensitive() {
    let executor = MockExecutor::new();

    let result = run_with_mock(
        &executor,
        &config(),
        &request("pod5", Some("DNA_R9.4.1_E8_SUP@V3.3")),
        RunOptions::default(),
    )
    .await;

    assert_aborted_at(&result, RunState::Validating);
    assert!(result.command_lines.is_empty());
}

#[tokio::test]
async fn test_catalog_model_is_used() {
    let executor = MockExecutor::new();
    let model = "dna_r9.4.1_e8_sup@v3.3";
    assert!(ModelCatalog.validate(model));

    let result = run_with_mock(&executor, &config(), &request("pod5", Some(model)), RunOptions::default()).await;

    assert_run_done(&result);
    assert_eq!(result.outcome.model.as_ref().unwrap().as_str(), model);
    let dorado = result.command("dorado").unwrap();
    assert!(dorado.contains(&format!("/srv/analyzer/dorado_models/{} ", model)), "{}", dorado);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    for file_type in ["bam", "POD5", ""] {
        let executor = MockExecutor::new();
        let result = run_with_mock(&executor, &config(), &request(file_type, None), RunOptions::default()).await;

        assert_aborted_at(&result, RunState::Validating);
        assert!(result.error().is_configuration());
        assert!(result.command_lines.is_empty(), "{}", file_type);
    }
}

#[tokio::test]
async fn test_staging_requires_bucket() {
    let executor = MockExecutor::new();

    let result = run_with_staging(&executor, &config(), &request("pod5", None), test_credentials()).await;

    assert_aborted_at(&result, RunState::Validating);
    assert!(result.error().to_string().contains("bucket"));
    assert!(result.command_lines.is_empty());
}

#[tokio::test]
async fn test_staging_requires_complete_credentials() {
    let executor = MockExecutor::new();
    let mut credentials = test_credentials();
    credentials.secret_access_key = None;
    let mut request = request("pod5", None);
    request.bucket_name = Some("samples".to_string());

    let result = run_with_staging(&executor, &config(), &request, credentials).await;

    assert_aborted_at(&result, RunState::Validating);
    assert!(result.error().to_string().contains("incomplete AWS credentials"));
    assert!(result.command_lines.is_empty());
}
