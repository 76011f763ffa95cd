//! Run state models

use crate::core::{
    catalog::ModelIdentifier,
    config::SampleId,
    error::PipelineError,
    stage::{ExecutionPath, Stage},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position of a run in the fixed stage sequence
///
/// The orchestrator only ever moves forward through these states. `Done`
/// and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Validating,
    Staging,
    ConvertingLegacySignal,
    ConvertingToAlignment,
    Sorting,
    Indexing,
    CallingVariants,
    Publishing,
    Done,
    Aborted,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Validating => "validating",
            RunState::Staging => "staging",
            RunState::ConvertingLegacySignal => "converting_legacy_signal",
            RunState::ConvertingToAlignment => "converting_to_alignment",
            RunState::Sorting => "sorting",
            RunState::Indexing => "indexing",
            RunState::CallingVariants => "calling_variants",
            RunState::Publishing => "publishing",
            RunState::Done => "done",
            RunState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Aborted)
    }

    fn ordinal(&self) -> u8 {
        match self {
            RunState::Validating => 0,
            RunState::Staging => 1,
            RunState::ConvertingLegacySignal => 2,
            RunState::ConvertingToAlignment => 3,
            RunState::Sorting => 4,
            RunState::Indexing => 5,
            RunState::CallingVariants => 6,
            RunState::Publishing => 7,
            RunState::Done | RunState::Aborted => 8,
        }
    }

    /// Whether `next` is a legal forward move from this state
    pub fn can_advance_to(&self, next: RunState) -> bool {
        !self.is_terminal() && (next == RunState::Aborted || next.ordinal() > self.ordinal())
    }
}

impl From<Stage> for RunState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Staging => RunState::Staging,
            Stage::ConvertingLegacySignal => RunState::ConvertingLegacySignal,
            Stage::ConvertingToAlignment => RunState::ConvertingToAlignment,
            Stage::Sorting => RunState::Sorting,
            Stage::Indexing => RunState::Indexing,
            Stage::CallingVariants => RunState::CallingVariants,
            Stage::Publishing => RunState::Publishing,
        }
    }
}

/// State of a single stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageState {
    /// Planned but not reached yet
    Pending,
    Running {
        started_at: DateTime<Utc>,
    },
    Completed {
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    Failed {
        error: String,
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
    },
    /// Never ran because an earlier stage failed
    Skipped {
        reason: String,
    },
}

impl StageState {
    /// Whether the stage's external process was started
    pub fn was_invoked(&self) -> bool {
        matches!(
            self,
            StageState::Running { .. } | StageState::Completed { .. } | StageState::Failed { .. }
        )
    }
}

/// A planned stage and what happened to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub state: StageState,
}

/// Final report of a single run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Unique run ID
    pub run_id: Uuid,

    pub sample: SampleId,

    /// Model actually used (set once validation passes)
    pub model: Option<ModelIdentifier>,

    /// Device path selected by the probe (set once validation passes)
    pub execution_path: Option<ExecutionPath>,

    /// Current position; terminal once the run returns
    pub state: RunState,

    /// Where the run stopped, when it aborted
    pub aborted_at: Option<RunState>,

    pub error: Option<PipelineError>,

    /// Planned stages in execution order
    pub stages: Vec<StageRecord>,

    pub started_at: DateTime<Utc>,

    pub finished_at: Option<DateTime<Utc>>,
}

impl RunOutcome {
    pub fn new(sample: SampleId) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            sample,
            model: None,
            execution_path: None,
            state: RunState::Validating,
            aborted_at: None,
            error: None,
            stages: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record the stage plan; every stage starts out pending
    pub fn plan(&mut self, stages: &[Stage]) {
        self.stages = stages
            .iter()
            .map(|stage| StageRecord {
                stage: *stage,
                state: StageState::Pending,
            })
            .collect();
    }

    /// Move to the next state; backwards moves are ignored
    pub fn advance(&mut self, next: RunState) -> bool {
        if self.state.can_advance_to(next) {
            self.state = next;
            true
        } else {
            tracing::warn!(
                "Ignoring run state transition {} -> {}",
                self.state.as_str(),
                next.as_str()
            );
            false
        }
    }

    pub fn stage_mut(&mut self, stage: Stage) -> Option<&mut StageRecord> {
        self.stages.iter_mut().find(|record| record.stage == stage)
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageRecord> {
        self.stages.iter().find(|record| record.stage == stage)
    }

    /// Mark the run done
    pub fn complete(&mut self) {
        self.advance(RunState::Done);
        self.finished_at = Some(Utc::now());
    }

    /// Abort the run at its current position; pending stages become skipped
    pub fn abort(&mut self, error: PipelineError) {
        let at = self.state;
        for record in &mut self.stages {
            if matches!(record.state, StageState::Pending) {
                record.state = StageState::Skipped {
                    reason: format!("run aborted at {}", at.as_str()),
                };
            }
        }
        self.aborted_at = Some(at);
        self.error = Some(error);
        self.advance(RunState::Aborted);
        self.finished_at = Some(Utc::now());
    }

    pub fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        if self.is_done() {
            0
        } else {
            1
        }
    }

    /// Stages whose external process was started, in order
    pub fn invoked_stages(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .filter(|record| record.state.was_invoked())
            .map(|record| record.stage)
            .collect()
    }

    pub fn completed_stages(&self) -> usize {
        self.stages
            .iter()
            .filter(|record| matches!(record.state, StageState::Completed { .. }))
            .count()
    }

    /// Fraction of planned stages that completed (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.stages.is_empty() {
            return 0.0;
        }
        self.completed_stages() as f64 / self.stages.len() as f64
    }
}
