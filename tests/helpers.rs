//! Test utility functions for pipeline-tool
#![allow(dead_code)]

use pipeline_tool::core::{Outcome, Pipeline, PipelineConfig, Stage, Status};
use pipeline_tool::execution::{ExecutionEngine, ExecutionEvent};
use pipeline_tool::runner::{CommandOutput, CommandRunner, RunnerError};

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted behaviour for one command
#[derive(Debug, Clone)]
pub struct Script {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub delay: Duration,
    pub launch_failure: bool,
}

impl Script {
    pub fn exit(exit_code: i32) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: String::new(),
            delay: Duration::ZERO,
            launch_failure: false,
        }
    }

    pub fn ok() -> Self {
        Self::exit(0)
    }

    pub fn fail() -> Self {
        Self::exit(1)
    }

    pub fn unlaunchable() -> Self {
        Self {
            launch_failure: true,
            ..Self::exit(0)
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_output(mut self, stdout: &str, stderr: &str) -> Self {
        self.stdout = stdout.to_string();
        self.stderr = stderr.to_string();
        self
    }
}

/// Mock runner that returns scripted results per command.
/// Unknown commands succeed immediately.
#[derive(Clone, Default)]
pub struct MockRunner {
    scripts: Arc<HashMap<String, Script>>,
    invocations: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl MockRunner {
    pub fn new(scripts: Vec<(&str, Script)>) -> Self {
        Self {
            scripts: Arc::new(
                scripts
                    .into_iter()
                    .map(|(command, script)| (command.to_string(), script))
                    .collect(),
            ),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Commands executed so far, in launch order
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(|(command, _)| command.clone())
            .collect()
    }

    /// Working directories the commands were launched in
    pub fn working_dirs(&self) -> Vec<PathBuf> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(|(_, dir)| dir.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn execute(&self, command: &str, working_dir: &Path) -> Result<CommandOutput, RunnerError> {
        self.invocations
            .lock()
            .unwrap()
            .push((command.to_string(), working_dir.to_path_buf()));

        let script = self.scripts.get(command).cloned().unwrap_or_else(Script::ok);

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        if script.launch_failure {
            return Err(RunnerError::Launch {
                command: command.to_string(),
                working_dir: working_dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            });
        }

        Ok(CommandOutput::new(script.exit_code, script.stdout, script.stderr).with_elapsed(script.delay))
    }
}

/// Test result from running a pipeline
#[derive(Debug, Clone)]
pub struct PipelineTestResult {
    pub pipeline: Pipeline,
    pub outcome: Outcome,
    pub events: Vec<ExecutionEvent>,
    pub wall_time: Duration,
}

impl PipelineTestResult {
    pub fn job_outcome(&self, name: &str) -> &Outcome {
        self.pipeline
            .job(name)
            .unwrap_or_else(|| panic!("Job '{}' should exist", name))
            .outcome()
    }

    pub fn stage_outcome(&self, index: usize) -> &Outcome {
        self.pipeline.stages()[index].outcome()
    }

    pub fn group(&self) -> &Stage {
        self.pipeline
            .stages()
            .iter()
            .find(|s| matches!(s, Stage::Concurrent(_)))
            .expect("Pipeline should contain a concurrent group")
    }
}

/// Parse a YAML spec and run it against the mock runner
pub async fn run_yaml_with_mock(yaml: &str, runner: &MockRunner) -> PipelineTestResult {
    let config = PipelineConfig::from_yaml(yaml).expect("Should parse YAML");
    let mut pipeline = config.to_pipeline();
    run_pipeline_with_runner(&mut pipeline, runner.clone()).await
}

/// Run a pipeline with any runner implementation, recording events
pub async fn run_pipeline_with_runner<R: CommandRunner + 'static>(
    pipeline: &mut Pipeline,
    runner: R,
) -> PipelineTestResult {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let mut engine = ExecutionEngine::new(runner);
    engine.add_event_handler(move |event| sink.lock().unwrap().push(event));

    let start = std::time::Instant::now();
    let outcome = engine.execute(pipeline).await;
    let wall_time = start.elapsed();

    let events = events.lock().unwrap().clone();
    PipelineTestResult {
        pipeline: pipeline.clone(),
        outcome,
        events,
        wall_time,
    }
}

/// Assert the cancelled-unit outcome exactly
pub fn assert_not_run(outcome: &Outcome) {
    assert_eq!(outcome, &Outcome::not_run(), "Expected NOT_RUN, got {:?}", outcome);
}

pub fn assert_status(outcome: &Outcome, status: Status) {
    assert_eq!(outcome.status, status, "Unexpected outcome {:?}", outcome);
}

/// Assert a duration lies within `[expected, expected + slack]`
pub fn assert_duration_near(actual: Duration, expected: Duration, slack: Duration) {
    assert!(
        actual >= expected && actual <= expected + slack,
        "Duration {:?} not within {:?} + {:?}",
        actual,
        expected,
        slack
    );
}
