//! Shell runner - executes commands through `sh -c`

use crate::runner::{CommandOutput, CommandRunner, RunnerError};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Default shell used to interpret job commands
pub const DEFAULT_SHELL: &str = "sh";

/// Runner that hands each command to a shell subprocess
#[derive(Debug, Clone)]
pub struct ShellRunner {
    /// Path to the shell executable
    shell: String,
}

impl ShellRunner {
    /// Create a runner using the given shell (e.g., "sh", "/bin/bash")
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Get the shell executable path
    pub fn shell(&self) -> &str {
        &self.shell
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    /// Calls `<shell> -c <command>` and captures stdout and stderr.
    ///
    /// The child is killed if the returned future is dropped, so an outer
    /// timeout really stops the command.
    async fn execute(&self, command: &str, working_dir: &Path) -> Result<CommandOutput, RunnerError> {
        debug!("Spawning `{} -c {}` in {}", self.shell, command, working_dir.display());

        let start = Instant::now();
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RunnerError::Launch {
                command: command.to_string(),
                working_dir: working_dir.to_path_buf(),
                source,
            })?;
        let elapsed = start.elapsed();

        let exit_code = output.status.code().unwrap_or(-1);
        debug!("`{}` exited with code {} after {:?}", command, exit_code, elapsed);

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed,
        })
    }
}
