//! CLI output formatting

use crate::{
    core::{RunOutcome, RunState, Stage},
    execution::ExecutionEvent,
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar sized to the stage plan
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a run state for display
pub fn format_run_state(state: RunState) -> String {
    match state {
        RunState::Done => style("DONE").green().to_string(),
        RunState::Aborted => style("ABORTED").red().to_string(),
        RunState::Validating => style("VALIDATING").dim().to_string(),
        other => style(other.as_str().to_uppercase()).yellow().to_string(),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> Option<String> {
    let line = match event {
        ExecutionEvent::RunStarted { run_id, sample } => format!(
            "{} Starting run for {} ({})",
            ROCKET,
            style(sample).bold(),
            style(&run_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::PathSelected { path } => {
            format!("{} Execution path: {}", INFO, style(path).cyan())
        }
        ExecutionEvent::StageStarted { stage, index, total } => format!(
            "{} [{}/{}] {}",
            SPINNER,
            index,
            total,
            style(stage.description()).cyan()
        ),
        ExecutionEvent::StageOutput { .. } => return None,
        ExecutionEvent::StageCompleted { stage } => {
            format!("{} {}", CHECK, style(stage).green())
        }
        ExecutionEvent::StageFailed { stage, error } => {
            format!("{} {}: {}", CROSS, style(stage).red(), style(error).dim())
        }
        ExecutionEvent::RunFinished { run_id, state } => format!(
            "{} Run ({}) {}",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_run_state(*state)
        ),
    };
    Some(line)
}

/// Format stage output with truncation
pub fn format_output(stage: Stage, output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let header = format!("{} Output from {}:", INFO, style(stage).dim());

    if lines.len() <= max_lines {
        format!("{}\n{}", header, output.trim_end())
    } else {
        let truncated = lines[..max_lines].join("\n");
        format!(
            "{}\n{}\n{}... ({} more lines)",
            header,
            truncated,
            style("[truncated]").dim(),
            lines.len() - max_lines
        )
    }
}

/// One-line final status for a run
pub fn format_outcome(outcome: &RunOutcome) -> String {
    match (&outcome.error, outcome.aborted_at) {
        (Some(error), Some(at)) => format!(
            "{} {} {} at {}: {}",
            CROSS,
            style(&outcome.sample).bold(),
            style("failed").red(),
            at.as_str(),
            error
        ),
        _ => format!(
            "{} {} completed {} ({}/{} stages)",
            CHECK,
            style(&outcome.sample).bold(),
            style("successfully").green(),
            outcome.completed_stages(),
            outcome.stages.len()
        ),
    }
}
