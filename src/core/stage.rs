//! Stage - one entry of a pipeline's sequence

use crate::core::{
    config::StageConfig,
    group::ConcurrentGroup,
    job::Job,
    outcome::Outcome,
};
use crate::execution::ExecutionEngine;
use serde::Serialize;

/// A runnable, reportable unit: a single job or a concurrent group
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    Job(Job),
    Concurrent(ConcurrentGroup),
}

impl Stage {
    /// Create a stage from its YAML declaration
    pub fn from_config(config: &StageConfig) -> Self {
        match config {
            StageConfig::Job(job) => Stage::Job(Job::from_config(job)),
            StageConfig::Concurrent { jobs } => {
                Stage::Concurrent(ConcurrentGroup::new(jobs.iter().map(Job::from_config).collect()))
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Stage::Job(job) => &job.name,
            Stage::Concurrent(group) => group.name(),
        }
    }

    pub fn outcome(&self) -> &Outcome {
        match self {
            Stage::Job(job) => job.outcome(),
            Stage::Concurrent(group) => group.outcome(),
        }
    }

    /// Nested jobs reported beneath this stage
    pub fn members(&self) -> &[Job] {
        match self {
            Stage::Job(_) => &[],
            Stage::Concurrent(group) => group.members(),
        }
    }

    pub async fn run(&mut self, engine: &ExecutionEngine, cancelled: bool, verbose: bool) -> &Outcome {
        match self {
            Stage::Job(job) => job.run(engine, cancelled, verbose).await,
            Stage::Concurrent(group) => group.run(engine, cancelled, verbose).await,
        }
    }

    pub fn cancel(&mut self) -> &Outcome {
        match self {
            Stage::Job(job) => job.cancel(),
            Stage::Concurrent(group) => group.cancel(),
        }
    }

    /// One-line report of the latest outcome
    pub fn describe(&self) -> String {
        match self {
            Stage::Job(job) => job.describe(),
            Stage::Concurrent(group) => group.describe(),
        }
    }
}

impl From<Job> for Stage {
    fn from(job: Job) -> Self {
        Stage::Job(job)
    }
}

impl From<ConcurrentGroup> for Stage {
    fn from(group: ConcurrentGroup) -> Self {
        Stage::Concurrent(group)
    }
}
