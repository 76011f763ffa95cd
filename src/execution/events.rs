//! Events emitted while a run progresses

use crate::core::{ExecutionPath, RunState, Stage};
use std::sync::Arc;
use uuid::Uuid;

/// Events that can occur during a pipeline run
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted {
        run_id: Uuid,
        sample: String,
    },
    PathSelected {
        path: ExecutionPath,
    },
    StageStarted {
        stage: Stage,
        /// 1-based position in the plan
        index: usize,
        total: usize,
    },
    /// Captured tool output, emitted for successful and failed invocations alike
    StageOutput {
        stage: Stage,
        stdout: String,
        stderr: String,
    },
    StageCompleted {
        stage: Stage,
    },
    StageFailed {
        stage: Stage,
        error: String,
    },
    RunFinished {
        run_id: Uuid,
        state: RunState,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Fan-out of events to registered handlers
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Vec<EventHandler>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers, in registration order
    pub fn emit(&self, event: ExecutionEvent) {
        for handler in &self.handlers {
            handler(event.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
