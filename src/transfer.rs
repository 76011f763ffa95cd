//! Object-storage staging through the AWS CLI

use crate::core::PipelineError;
use crate::process::{CommandExecutor, CommandSpec, StageResult};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, error, info};

/// The narrow set of object-storage calls the pipeline needs
#[async_trait]
pub trait ArtifactTransfer: Send + Sync {
    /// Fail fast when credentials are missing or incomplete
    async fn check_credentials(&self) -> Result<(), PipelineError>;

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, PipelineError>;

    /// Recursively copy the bucket contents into `dest`
    async fn download_dir(&self, bucket: &str, dest: &Path) -> Result<(), PipelineError>;

    /// Copy a single file to the root of the bucket
    async fn upload_file(&self, source: &Path, bucket: &str) -> Result<(), PipelineError>;
}

/// Marker the AWS CLI prints when its credential chain comes up empty
const NO_CREDENTIALS: &str = "Unable to locate credentials";

/// Explicit key pair from the environment
///
/// Absent keys are not an error here; the CLI may still find credentials in
/// the shared credentials file, SSO or an instance role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());
        Self {
            access_key_id: var("AWS_ACCESS_KEY_ID"),
            secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
        }
    }

    /// Reject a key pair with only one half set
    pub fn check(&self) -> Result<(), PipelineError> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(_), None) | (None, Some(_)) => {
                Err(PipelineError::configuration("incomplete AWS credentials"))
            }
            _ => Ok(()),
        }
    }
}

/// `ArtifactTransfer` implemented with `aws s3` / `aws s3api` invocations
pub struct AwsCliTransfer<E> {
    executor: E,
    credentials: Credentials,
}

impl<E: CommandExecutor> AwsCliTransfer<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            credentials: Credentials::from_env(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    async fn run(&self, spec: CommandSpec) -> Result<StageResult, PipelineError> {
        info!("{}", spec);
        let result = self
            .executor
            .execute(&spec)
            .await
            .map_err(|e| PipelineError::transfer(e.to_string()))?;

        if result.success() {
            if !result.stdout.trim().is_empty() {
                info!("[aws] STDOUT: {}", result.stdout.trim_end());
            }
            if !result.stderr.trim().is_empty() {
                info!("[aws] STDERR: {}", result.stderr.trim_end());
            }
        } else {
            error!("ERROR: aws exited with code {:?}", result.exit_code);
            error!("STDOUT: {}", result.stdout.trim_end());
            error!("STDERR: {}", result.stderr.trim_end());
        }
        Ok(result)
    }
}

fn bucket_url(bucket: &str) -> String {
    format!("s3://{}/", bucket)
}

fn failure(action: &str, result: &StageResult) -> PipelineError {
    PipelineError::transfer(format!(
        "{} failed with code {:?}: {}",
        action,
        result.exit_code,
        result.stderr.trim()
    ))
}

#[async_trait]
impl<E: CommandExecutor> ArtifactTransfer for AwsCliTransfer<E> {
    /// Ask the CLI's own credential chain who we are
    async fn check_credentials(&self) -> Result<(), PipelineError> {
        self.credentials.check()?;

        let result = self
            .run(CommandSpec::new("aws").args(["sts", "get-caller-identity"]))
            .await?;

        if result.success() {
            return Ok(());
        }
        if result.stderr.contains(NO_CREDENTIALS) {
            return Err(PipelineError::configuration("AWS credentials not found"));
        }
        Err(failure("credential check", &result))
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, PipelineError> {
        let result = self
            .run(CommandSpec::new("aws").args(["s3api", "head-bucket", "--bucket", bucket]))
            .await?;

        if result.success() {
            return Ok(true);
        }
        if result.stderr.contains("404") || result.stderr.contains("Not Found") {
            debug!("Bucket {} does not exist", bucket);
            return Ok(false);
        }
        Err(failure("head-bucket", &result))
    }

    async fn download_dir(&self, bucket: &str, dest: &Path) -> Result<(), PipelineError> {
        let spec = CommandSpec::new("aws")
            .args(["s3", "cp"])
            .arg(bucket_url(bucket))
            .path(dest)
            .arg("--recursive");
        let result = self.run(spec).await?;
        if result.success() {
            Ok(())
        } else {
            Err(failure("download", &result))
        }
    }

    async fn upload_file(&self, source: &Path, bucket: &str) -> Result<(), PipelineError> {
        let spec = CommandSpec::new("aws")
            .args(["s3", "cp"])
            .path(source)
            .arg(bucket_url(bucket));
        let result = self.run(spec).await?;
        if result.success() {
            Ok(())
        } else {
            Err(failure("upload", &result))
        }
    }
}
