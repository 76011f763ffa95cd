//! Core domain models for the analyzer pipeline
//!
//! This module defines the run configuration, the model catalog, the stage
//! vocabulary and the state a run moves through.

pub mod catalog;
pub mod config;
pub mod error;
pub mod stage;
pub mod state;

pub use catalog::{ModelCatalog, ModelIdentifier, DEFAULT_MODEL};
pub use config::{Artifact, Deployment, PipelineConfig, SampleId};
pub use error::PipelineError;
pub use stage::{ExecutionPath, FileType, Stage};
pub use state::{RunOutcome, RunState, StageRecord, StageState};
