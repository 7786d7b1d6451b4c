//! CLI command definitions

use crate::core::RunConfig;
use clap::Args;

/// Run a pipeline
#[derive(Debug, Args, Clone, Default)]
pub struct RunCommand {
    /// Echo each job's captured output when it finishes
    #[arg(long)]
    pub verbose: bool,

    /// Skip the remaining stages after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the final result tree as JSON instead of the summary
    #[arg(long)]
    pub json: bool,
}

impl RunCommand {
    /// Apply the command-line switches on top of the options from the file.
    /// Switches can only turn options on.
    pub fn apply(&self, config: &mut RunConfig) {
        config.verbose |= self.verbose;
        config.fail_fast |= self.fail_fast;
    }
}

/// Validate a pipeline configuration
#[derive(Debug, Args, Clone, Default)]
pub struct ValidateCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
