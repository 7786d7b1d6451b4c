//! Main execution engine - binds a command runner to event handlers

use crate::{
    core::{Outcome, Pipeline, Status},
    runner::CommandRunner,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        run_id: Uuid,
        pipeline_name: String,
        stages: usize,
    },
    StageStarted {
        index: usize,
        name: String,
    },
    /// The stage was cancelled by fail-fast
    StageSkipped {
        index: usize,
        name: String,
    },
    /// Captured output of a finished job, only emitted in verbose mode
    JobOutput {
        job: String,
        stdout: String,
        stderr: String,
    },
    JobFinished {
        job: String,
        outcome: Outcome,
    },
    StageFinished {
        index: usize,
        name: String,
        status: Status,
        duration: Duration,
    },
    PipelineFinished {
        run_id: Uuid,
        status: Status,
        duration: Duration,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Main pipeline execution engine
///
/// Cloning is cheap; concurrent group members each get a clone.
#[derive(Clone)]
pub struct ExecutionEngine {
    runner: Arc<dyn CommandRunner>,
    event_handlers: Vec<EventHandler>,
}

impl ExecutionEngine {
    pub fn new<R: CommandRunner + 'static>(runner: R) -> Self {
        Self::with_shared_runner(Arc::new(runner))
    }

    pub fn with_shared_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers. A panicking handler is logged and
    /// skipped; it never reaches the run loop.
    pub(crate) fn emit(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| handler(event.clone())));
            if delivered.is_err() {
                warn!("Event handler panicked while handling {:?}", event);
            }
        }
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Execute the entire pipeline and return its overall outcome
    pub async fn execute(&self, pipeline: &mut Pipeline) -> Outcome {
        pipeline.run(self).await.clone()
    }
}
