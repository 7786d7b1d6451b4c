//! Pipeline domain model

use crate::core::{
    config::{PipelineConfig, RunConfig, DEFAULT_PIPELINE_NAME},
    job::Job,
    outcome::{Outcome, Status},
    stage::Stage,
};
use crate::execution::{ExecutionEngine, ExecutionEvent};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// An ordered sequence of stages and the options they run with
#[derive(Debug, Clone, Serialize)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    /// Run-level options
    pub config: RunConfig,

    /// Stages in declaration (and execution) order
    stages: Vec<Stage>,

    /// Identifier of the latest run
    run_id: Uuid,

    /// When the latest run started
    started_at: Option<DateTime<Utc>>,

    #[serde(rename = "outcome")]
    last_outcome: Outcome,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: RunConfig::default(),
            stages: Vec::new(),
            run_id: Uuid::new_v4(),
            started_at: None,
            last_outcome: Outcome::not_run(),
        }
    }

    /// Create a pipeline from configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut pipeline = Self::new(config.name.clone()).with_config(config.config);
        pipeline.stages = config.stages.iter().map(Stage::from_config).collect();
        pipeline
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_stage(mut self, stage: impl Into<Stage>) -> Self {
        self.push_stage(stage);
        self
    }

    /// Append a stage after the existing ones
    pub fn push_stage(&mut self, stage: impl Into<Stage>) {
        self.stages.push(stage.into());
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Get a top-level stage by name
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name() == name)
    }

    /// Get a job by name, looking inside concurrent groups too
    pub fn job(&self, name: &str) -> Option<&Job> {
        self.stages.iter().find_map(|stage| match stage {
            Stage::Job(job) if job.name == name => Some(job),
            Stage::Job(_) => None,
            Stage::Concurrent(group) => group.member(name),
        })
    }

    pub fn outcome(&self) -> &Outcome {
        &self.last_outcome
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Run every stage in order and aggregate the result.
    ///
    /// With fail-fast, the first failing stage cancels every later one. The
    /// total duration is the sum of stage durations; cancelled stages add 0.
    pub async fn run(&mut self, engine: &ExecutionEngine) -> &Outcome {
        self.run_id = Uuid::new_v4();
        self.started_at = Some(Utc::now());
        let verbose = self.config.verbose;
        let fail_fast = self.config.fail_fast;

        info!("Starting pipeline execution: {} ({})", self.name, self.run_id);
        engine.emit(ExecutionEvent::PipelineStarted {
            run_id: self.run_id,
            pipeline_name: self.name.clone(),
            stages: self.stages.len(),
        });

        let mut cancelled = false;
        let mut total = Duration::ZERO;
        let mut status = Status::Success;

        for (index, stage) in self.stages.iter_mut().enumerate() {
            let name = stage.name().to_string();
            if cancelled {
                engine.emit(ExecutionEvent::StageSkipped { index, name: name.clone() });
            } else {
                engine.emit(ExecutionEvent::StageStarted { index, name: name.clone() });
            }

            let (stage_status, stage_duration) = {
                let outcome = stage.run(engine, cancelled, verbose).await;
                (outcome.status, outcome.duration)
            };
            total += stage_duration;

            if stage_status == Status::Error {
                status = Status::Error;
                if fail_fast && !cancelled {
                    warn!("Stage {} failed, skipping remaining stages (fail-fast)", name);
                    cancelled = true;
                }
            }

            if stage_status.is_terminal() {
                engine.emit(ExecutionEvent::StageFinished {
                    index,
                    name,
                    status: stage_status,
                    duration: stage_duration,
                });
            }
        }

        self.last_outcome = Outcome::aggregate(status, total);

        info!(
            "Pipeline execution finished: {} - {:?} after {:.2}s",
            self.name,
            status,
            self.last_outcome.secs()
        );
        engine.emit(ExecutionEvent::PipelineFinished {
            run_id: self.run_id,
            status,
            duration: total,
        });

        &self.last_outcome
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(DEFAULT_PIPELINE_NAME)
    }
}
