//! Execution outcome models

use serde::{Serialize, Serializer};
use std::time::Duration;

/// Text carried by an outcome that was never produced by a command
pub const NOT_AVAILABLE: &str = "Not available.";

/// Result classification of a single unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The command exited with code 0 (or every member of a group did)
    Success,
    /// The command exited non-zero, could not be launched, or a member failed
    Error,
    /// The unit was cancelled by fail-fast or has not run yet
    NotRun,
}

impl Status {
    /// Check if the unit reached a terminal state by actually running
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Success | Status::Error)
    }
}

/// Result record produced by running a job, a group or a whole pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub status: Status,

    /// Wall-clock time spent running the unit
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,

    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    /// The outcome of a unit that was skipped or has not run yet
    pub fn not_run() -> Self {
        Self {
            status: Status::NotRun,
            duration: Duration::ZERO,
            stdout: NOT_AVAILABLE.to_string(),
            stderr: String::new(),
        }
    }

    /// The outcome of a command that ran to completion
    pub fn finished(exit_code: i32, duration: Duration, stdout: String, stderr: String) -> Self {
        let status = if exit_code == 0 {
            Status::Success
        } else {
            Status::Error
        };

        Self {
            status,
            duration,
            stdout,
            stderr,
        }
    }

    /// An error outcome for a command that never produced an exit code
    pub fn failed(duration: Duration, reason: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            duration,
            stdout: String::new(),
            stderr: reason.into(),
        }
    }

    /// An aggregate outcome; only status and timing roll up
    pub fn aggregate(status: Status, duration: Duration) -> Self {
        Self {
            status,
            duration,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    pub fn is_not_run(&self) -> bool {
        self.status == Status::NotRun
    }

    /// Duration in seconds, as shown in reports
    pub fn secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::not_run()
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
