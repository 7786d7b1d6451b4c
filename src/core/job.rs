//! Job domain model

use crate::core::{
    config::NamedJob,
    outcome::{Outcome, Status},
};
use crate::execution::{ExecutionEngine, ExecutionEvent};
use crate::runner::RunnerError;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// A single shell command bound to a working directory
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    /// Job name, used for reporting only
    pub name: String,

    /// Shell command, executed verbatim
    pub command: String,

    /// Directory the command runs in
    pub working_dir: PathBuf,

    /// Wall-clock limit for the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Result of the latest run
    #[serde(rename = "outcome")]
    last_outcome: Outcome,
}

impl Job {
    /// Create a job running in the current directory
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            working_dir: PathBuf::from("."),
            timeout_secs: None,
            last_outcome: Outcome::not_run(),
        }
    }

    /// Create a job from its YAML declaration
    pub fn from_config(config: &NamedJob) -> Self {
        Self {
            name: config.name.clone(),
            command: config.spec.run.clone(),
            working_dir: config.spec.context.clone(),
            timeout_secs: config.spec.timeout,
            last_outcome: Outcome::not_run(),
        }
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Outcome of the latest run (NOT_RUN before the first one)
    pub fn outcome(&self) -> &Outcome {
        &self.last_outcome
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.last_outcome = outcome;
    }

    /// Mark the job as not run. Spawns nothing and reads no clock.
    pub fn cancel(&mut self) -> &Outcome {
        self.last_outcome = Outcome::not_run();
        &self.last_outcome
    }

    /// Run the job, or cancel it when `cancelled` is set
    pub async fn run(&mut self, engine: &ExecutionEngine, cancelled: bool, verbose: bool) -> &Outcome {
        if cancelled {
            return self.cancel();
        }

        let outcome = self.execute(engine).await;
        self.report(engine, &outcome, verbose);
        self.last_outcome = outcome;
        &self.last_outcome
    }

    /// Run the command through the engine's runner and build its outcome
    /// without touching `self`. Emits no events.
    pub(crate) async fn execute(&self, engine: &ExecutionEngine) -> Outcome {
        info!("Running job: {}", self.name);
        debug!(
            "Job {} command `{}` in {}",
            self.name,
            self.command,
            self.working_dir.display()
        );

        let start = Instant::now();
        let execution = engine.runner().execute(&self.command, &self.working_dir);
        let result = match self.timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), execution).await {
                Ok(result) => result,
                Err(_) => Err(RunnerError::Timeout(secs)),
            },
            None => execution.await,
        };
        let duration = start.elapsed();

        let outcome = match result {
            Ok(output) => Outcome::finished(output.exit_code, duration, output.stdout, output.stderr),
            Err(e) => {
                warn!("Job {} could not run: {}", self.name, e);
                Outcome::failed(duration, e.to_string())
            }
        };

        match outcome.status {
            Status::Success => info!("Job {} succeeded after {:.2}s", self.name, outcome.secs()),
            _ => info!("Job {} failed after {:.2}s", self.name, outcome.secs()),
        }
        outcome
    }

    /// Hand a finished outcome to the event handlers
    pub(crate) fn report(&self, engine: &ExecutionEngine, outcome: &Outcome, verbose: bool) {
        if verbose {
            engine.emit(ExecutionEvent::JobOutput {
                job: self.name.clone(),
                stdout: outcome.stdout.clone(),
                stderr: outcome.stderr.clone(),
            });
        }

        engine.emit(ExecutionEvent::JobFinished {
            job: self.name.clone(),
            outcome: outcome.clone(),
        });
    }

    /// One-line report of the latest outcome
    pub fn describe(&self) -> String {
        match self.last_outcome.status {
            Status::Success => format!(
                "{} succeeded after {:.2}s.",
                self.name,
                self.last_outcome.secs()
            ),
            Status::NotRun => format!("{} was not run due to fail-fast argument.", self.name),
            Status::Error => format!("{} failed after {:.2}s.", self.name, self.last_outcome.secs()),
        }
    }
}
