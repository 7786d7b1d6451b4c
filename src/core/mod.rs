//! Core domain models for Pipeline
//!
//! This module defines the execution tree (jobs, concurrent groups and the
//! pipeline that sequences them), the outcomes they produce, and the YAML
//! configuration they are built from.

pub mod config;
pub mod group;
pub mod job;
pub mod outcome;
pub mod pipeline;
pub mod stage;

pub use config::{PipelineConfig, RunConfig, SpecError};
pub use group::ConcurrentGroup;
pub use job::Job;
pub use outcome::{Outcome, Status};
pub use pipeline::*;
pub use stage::Stage;
