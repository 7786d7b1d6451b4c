use anyhow::{Context, Result};
use pipeline_tool::cli::commands::{RunCommand, ValidateCommand};
use pipeline_tool::cli::output::*;
use pipeline_tool::cli::{Cli, Command};
use pipeline_tool::core::PipelineConfig;
use pipeline_tool::{ExecutionEngine, ShellRunner};
use std::io::Write;
use std::path::Path;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG wins over the --debug flag
    let default_level = if cli.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match cli.command() {
        Command::Run(cmd) => run_pipeline(&cmd, cli.file.as_deref()).await,
        Command::Validate(cmd) => validate_pipeline(&cmd, cli.file.as_deref()),
    }
}

async fn run_pipeline(cmd: &RunCommand, file: Option<&Path>) -> Result<()> {
    let config = match file {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load pipeline spec {}", path.display()))?,
        None => {
            if !cmd.json {
                println!("{}No pipeline spec given (use --file), no stages to run", INFO);
            }
            PipelineConfig::default()
        }
    };

    let mut pipeline = config.to_pipeline();
    cmd.apply(&mut pipeline.config);

    let mut engine = ExecutionEngine::new(ShellRunner::default());

    // JSON mode keeps stdout machine-readable
    if !cmd.json {
        engine.add_event_handler(|event| {
            if let Some(line) = format_execution_event(&event) {
                // A closed stdout must not affect the run
                let _ = writeln!(std::io::stdout(), "{}", line);
            }
        });
    }

    let outcome = engine.execute(&mut pipeline).await;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&pipeline)?);
    } else {
        println!();
        print!("{}", format_summary(&pipeline));
    }

    if outcome.is_error() {
        std::process::exit(1);
    }

    Ok(())
}

fn validate_pipeline(cmd: &ValidateCommand, file: Option<&Path>) -> Result<()> {
    let path = file.context("validate needs a pipeline spec (use --file)")?;

    match PipelineConfig::from_file(path) {
        Ok(config) => {
            println!("{}", format_validation(&config, cmd.json)?);
            Ok(())
        }
        // Keep stdout empty in JSON mode; anyhow reports on stderr
        Err(e) if cmd.json => {
            Err(e).with_context(|| format!("Invalid pipeline spec {}", path.display()))
        }
        Err(e) => {
            println!("{}Validating pipeline...", INFO);
            println!("{}Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
