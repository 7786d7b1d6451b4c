//! Concurrent group domain model

use crate::core::{
    job::Job,
    outcome::{Outcome, Status},
};
use crate::execution::ExecutionEngine;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Label shared by every concurrent group
pub const GROUP_NAME: &str = "Concurrent";

/// A fixed set of jobs launched in parallel and reduced to one outcome
#[derive(Debug, Clone, Serialize)]
pub struct ConcurrentGroup {
    name: &'static str,

    /// Member jobs in declaration order
    members: Vec<Job>,

    #[serde(rename = "outcome")]
    last_outcome: Outcome,
}

impl ConcurrentGroup {
    pub fn new(members: Vec<Job>) -> Self {
        Self {
            name: GROUP_NAME,
            members,
            last_outcome: Outcome::not_run(),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn members(&self) -> &[Job] {
        &self.members
    }

    /// Get a member by name
    pub fn member(&self, name: &str) -> Option<&Job> {
        self.members.iter().find(|job| job.name == name)
    }

    pub fn outcome(&self) -> &Outcome {
        &self.last_outcome
    }

    /// Cancel every member without spawning anything
    pub fn cancel(&mut self) -> &Outcome {
        for job in &mut self.members {
            job.cancel();
        }
        self.last_outcome = Outcome::not_run();
        &self.last_outcome
    }

    /// Run every member concurrently and wait for all of them.
    ///
    /// Each member runs in its own task. A member whose task panics is
    /// recorded as an error; the others are still collected.
    pub async fn run(&mut self, engine: &ExecutionEngine, cancelled: bool, verbose: bool) -> &Outcome {
        if cancelled {
            return self.cancel();
        }

        info!("Launching {} concurrent jobs", self.members.len());
        let launched = Instant::now();

        let handles: Vec<JoinHandle<Outcome>> = self
            .members
            .iter()
            .map(|job| {
                let job = job.clone();
                let engine = engine.clone();
                tokio::spawn(async move { job.execute(&engine).await })
            })
            .collect();

        // Member events come from this task, in declaration order
        for (job, handle) in self.members.iter_mut().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Job {} did not complete: {}", job.name, e);
                    Outcome::failed(launched.elapsed(), format!("Job did not complete: {}", e))
                }
            };
            job.report(engine, &outcome, verbose);
            job.set_outcome(outcome);
        }

        self.last_outcome = Self::collect(self.members.iter().map(Job::outcome));
        info!(
            "Concurrent jobs finished: {:?} after {:.2}s",
            self.last_outcome.status,
            self.last_outcome.secs()
        );
        &self.last_outcome
    }

    /// Reduce member outcomes: the slowest member sets the duration and any
    /// error fails the group. Captured output stays with the members.
    pub fn collect<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Outcome {
        let mut duration = Duration::ZERO;
        let mut status = Status::Success;

        for outcome in outcomes {
            duration = duration.max(outcome.duration);
            if outcome.is_error() {
                status = Status::Error;
            }
        }

        Outcome::aggregate(status, duration)
    }

    /// One-line report of the latest outcome
    pub fn describe(&self) -> String {
        match self.last_outcome.status {
            Status::Success => format!(
                "{} jobs succeeded after {:.2}s.",
                self.name,
                self.last_outcome.secs()
            ),
            Status::NotRun => format!("{} jobs were not run due to fail-fast argument.", self.name),
            Status::Error => format!(
                "Some {} job(s) failed after {:.2}s.",
                self.name,
                self.last_outcome.secs()
            ),
        }
    }
}
