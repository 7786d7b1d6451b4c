//! Command output and runner error types

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error types for runner operations
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to launch `{command}` in {}: {source}", working_dir.display())]
    Launch {
        command: String,
        working_dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

/// Captured result of a command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `-1` when the process was terminated by a signal
    pub exit_code: i32,

    pub stdout: String,
    pub stderr: String,

    /// Time between spawning the process and collecting its output
    pub elapsed: Duration,
}

impl CommandOutput {
    /// Create a new command output
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
