//! CLI output formatting

use crate::{
    core::{config::StageConfig, Outcome, Pipeline, PipelineConfig, Stage, Status},
    execution::ExecutionEvent,
};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static STOP: Emoji<'_, '_> = Emoji("⛔ ", "- ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static TIMER: Emoji<'_, '_> = Emoji("⏱ ", "");

const SUMMARY_HEADER: &str = "=== Summary ===";
const SUMMARY_FOOTER: &str = "===============";

/// Marker printed in front of a unit's report line
pub fn status_marker(status: Status) -> Emoji<'static, 'static> {
    match status {
        Status::Success => CHECK,
        Status::Error => CROSS,
        Status::NotRun => STOP,
    }
}

/// Format a status for display
pub fn format_status(status: Status) -> String {
    match status {
        Status::Success => style("SUCCESS").green().to_string(),
        Status::Error => style("ERROR").red().to_string(),
        Status::NotRun => style("NOT RUN").dim().to_string(),
    }
}

/// Report lines for a stage; group members are indented one level deeper
pub fn format_stage(stage: &Stage, depth: usize) -> Vec<String> {
    let mut lines = vec![format_line(stage.outcome(), &stage.describe(), depth)];
    for job in stage.members() {
        lines.push(format_line(job.outcome(), &job.describe(), depth + 1));
    }
    lines
}

fn format_line(outcome: &Outcome, text: &str, depth: usize) -> String {
    format!(
        "{}{}{}",
        "  ".repeat(depth + 1),
        status_marker(outcome.status),
        text
    )
}

/// Format the end-of-run summary: banner, one line per unit, closing rule
pub fn format_summary(pipeline: &Pipeline) -> String {
    let outcome = pipeline.outcome();
    let banner = match outcome.status {
        Status::Success => format!(
            "{}: {} {}Total time: {:.2}s.",
            CHECK,
            style("All jobs completed successfully.").green(),
            TIMER,
            outcome.secs()
        ),
        Status::Error => format!(
            "{}: {} {}Total time: {:.2}s.",
            CROSS,
            style("Some jobs failed.").red(),
            TIMER,
            outcome.secs()
        ),
        Status::NotRun => format!("{}: {}", STOP, style("Pipeline has not run.").dim()),
    };

    let mut lines = vec![SUMMARY_HEADER.to_string(), banner, "Jobs:".to_string()];
    for stage in pipeline.stages() {
        lines.extend(format_stage(stage, 0));
    }
    lines.push(SUMMARY_FOOTER.to_string());

    let mut summary = lines.join("\n");
    summary.push('\n');
    summary
}

/// Format the captured output of a job (verbose mode)
pub fn format_job_output(job: &str, stdout: &str, stderr: &str) -> String {
    format!(
        "#### {} output:\n## Stdout:\n{}\n## Stderr:\n{}",
        style(job).bold(),
        stdout,
        stderr
    )
}

/// Format an execution event for display, `None` for events printed silently
pub fn format_execution_event(event: &ExecutionEvent) -> Option<String> {
    match event {
        ExecutionEvent::PipelineStarted {
            run_id,
            pipeline_name,
            stages,
        } => Some(format!(
            "{}Starting pipeline {} ({}, {} stages)",
            ROCKET,
            style(pipeline_name).bold(),
            style(&run_id.to_string()[..8]).dim(),
            stages
        )),
        ExecutionEvent::StageStarted { name, .. } => {
            Some(format!("{}{}", SPINNER, style(name).cyan()))
        }
        ExecutionEvent::StageSkipped { name, .. } => Some(format!(
            "{}{} {}",
            STOP,
            style(name).dim(),
            style("skipped (fail-fast)").dim()
        )),
        ExecutionEvent::JobOutput {
            job,
            stdout,
            stderr,
        } => Some(format_job_output(job, stdout, stderr)),
        ExecutionEvent::JobFinished { job, outcome } => {
            let name = match outcome.status {
                Status::Success => style(job).green(),
                _ => style(job).red(),
            };
            Some(format!(
                "{}{} {}",
                status_marker(outcome.status),
                name,
                style(format!("({:.2}s)", outcome.secs())).dim()
            ))
        }
        ExecutionEvent::StageFinished { .. } => None,
        ExecutionEvent::PipelineFinished {
            status, duration, ..
        } => Some(format!(
            "{}Pipeline finished: {} after {:.2}s",
            INFO,
            format_status(*status),
            duration.as_secs_f64()
        )),
    }
}

/// Format the stage layout of a validated spec
pub fn format_config(config: &PipelineConfig) -> String {
    let mut lines = vec![
        format!("  Name: {}", style(&config.name).bold()),
        format!("  Stages: {}", style(config.stages.len()).cyan()),
        format!("  Jobs: {}", style(config.job_count()).cyan()),
        format!(
            "  Options: verbose={} fail-fast={}",
            config.config.verbose, config.config.fail_fast
        ),
    ];

    for stage in &config.stages {
        match stage {
            StageConfig::Job(job) => {
                lines.push(format!("    {} {}", style(&job.name).cyan(), style(&job.spec.run).dim()));
            }
            StageConfig::Concurrent { jobs } => {
                lines.push(format!("    {}", style("concurrent").cyan()));
                for job in jobs {
                    lines.push(format!(
                        "      {} {}",
                        style(&job.name).cyan(),
                        style(&job.spec.run).dim()
                    ));
                }
            }
        }
    }

    lines.join("\n")
}

/// Report for a spec that passed validation: the stage layout, or the
/// parsed config alone as JSON
pub fn format_validation(config: &PipelineConfig, json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(config);
    }

    Ok(format!(
        "{}Validating pipeline...\n{}Pipeline configuration is valid!\n{}",
        INFO,
        CHECK,
        format_config(config)
    ))
}
