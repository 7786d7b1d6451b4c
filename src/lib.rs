//! pipeline-tool - run declarative pipelines of shell commands locally

pub mod cli;
pub mod core;
pub mod execution;
pub mod runner;

// Re-export commonly used types
pub use crate::core::{ConcurrentGroup, Job, Outcome, Pipeline, PipelineConfig, RunConfig, SpecError, Stage, Status};
pub use execution::{ExecutionEngine, ExecutionEvent};
pub use runner::{CommandOutput, CommandRunner, RunnerError, ShellRunner};
