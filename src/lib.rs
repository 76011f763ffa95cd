//! analyzer - nanopore basecalling and structural variant calling pipeline

pub mod cli;
pub mod core;
pub mod execution;
pub mod process;
pub mod report;
pub mod transfer;
pub mod workspace;

// Re-export commonly used types
pub use crate::core::{ModelCatalog, PipelineConfig, PipelineError, RunOutcome, RunState, Stage};
pub use crate::execution::{ExecutionEvent, PipelineOrchestrator, RunOptions, RunRequest};
pub use crate::process::{CommandExecutor, CommandSpec, ProcessExecutor, StageResult};
pub use crate::transfer::{ArtifactTransfer, AwsCliTransfer};
