//! Pipeline execution: capability probe, stage commands and the orchestrator

pub mod commands;
pub mod engine;
pub mod events;
pub mod probe;
pub mod runner;

pub use engine::{PipelineOrchestrator, RunOptions, RunRequest};
pub use events::{EventBus, EventHandler, ExecutionEvent};
pub use probe::CapabilityProbe;
pub use runner::StageRunner;
