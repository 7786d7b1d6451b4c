//! Command runners for executing shell commands

pub mod output;
pub mod shell;

use async_trait::async_trait;
use std::path::Path;

pub use output::{CommandOutput, RunnerError};
pub use shell::ShellRunner;

/// Trait for command execution - allows for different implementations
///
/// A non-zero exit status is not an error: it is reported through
/// [`CommandOutput::exit_code`]. Only a command that cannot be launched at
/// all yields `Err`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` inside `working_dir` and wait for it to exit
    async fn execute(&self, command: &str, working_dir: &Path) -> Result<CommandOutput, RunnerError>;
}
