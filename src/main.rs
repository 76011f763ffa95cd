use analyzer::cli::output::*;
use analyzer::cli::{Cli, Mode};
use analyzer::core::{ModelCatalog, PipelineConfig, PipelineError, RunState};
use analyzer::execution::{ExecutionEvent, PipelineOrchestrator, RunOptions, RunRequest};
use analyzer::process::ProcessExecutor;
use analyzer::report::{create_summary, rejected_summary, write_summary, RunSummary};
use analyzer::transfer::AwsCliTransfer;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_from_args() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let mode = match cli.mode() {
        Ok(mode) => mode,
        Err(e) => {
            println!("{} {}", CROSS, style(e).red());
            std::process::exit(1);
        }
    };

    match mode {
        Mode::ListModels => list_models(),
        Mode::Run {
            sample_name,
            request,
            options,
        } => run_pipeline(&cli, &sample_name, &request, options).await?,
    }

    Ok(())
}

fn list_models() {
    print!("{}", ModelCatalog.render());
}

fn derive_config(sample_name: &str) -> Result<PipelineConfig, PipelineError> {
    let home = dirs::home_dir()
        .ok_or_else(|| PipelineError::configuration("cannot determine the home directory"))?;
    PipelineConfig::derive(&home, sample_name)
}

async fn run_pipeline(
    cli: &Cli,
    sample_name: &str,
    request: &RunRequest,
    options: RunOptions,
) -> Result<()> {
    let config = match derive_config(sample_name) {
        Ok(config) => config,
        Err(e) => {
            error!("ERROR: {}", e);
            if let Some(path) = &cli.report {
                save_report(&rejected_summary(sample_name, &e), path);
            }
            println!("{} {}", CROSS, style(e).red());
            std::process::exit(1);
        }
    };

    println!(
        "{} Sample {} in {}",
        INFO,
        style(config.sample()).bold(),
        style(config.base_dir().display()).dim()
    );

    let mut orchestrator = PipelineOrchestrator::new(ProcessExecutor::new()).with_options(options);
    if options.enable_staging {
        orchestrator = orchestrator.with_transfer(AwsCliTransfer::new(ProcessExecutor::new()));
    }

    // Set up event handler for console output
    let progress = create_progress_bar(0);
    let verbose = cli.verbose;
    let bar = progress.clone();
    orchestrator.add_event_handler(move |event| {
        match &event {
            ExecutionEvent::StageStarted { stage, index, total } => {
                bar.set_length(*total as u64);
                bar.set_position(*index as u64 - 1);
                bar.set_message(stage.description());
            }
            ExecutionEvent::StageCompleted { .. } => bar.inc(1),
            ExecutionEvent::RunFinished { .. } => bar.finish_and_clear(),
            _ => {}
        }

        if let Some(line) = format_execution_event(&event) {
            bar.suspend(|| println!("{}", line));
        }

        // Show captured tool output only when asked to
        if verbose {
            if let ExecutionEvent::StageOutput { stage, stdout, stderr } = &event {
                for output in [stdout, stderr].into_iter().filter(|o| !o.trim().is_empty()) {
                    bar.suspend(|| println!("{}", format_output(*stage, output, 5)));
                }
            }
        }
    });

    println!();
    let outcome = orchestrator.run(&config, request).await;
    progress.finish_and_clear();

    if let Some(path) = &cli.report {
        save_report(&create_summary(&outcome), path);
    }

    // An unknown model also lists what is available
    if outcome.aborted_at == Some(RunState::Validating) {
        if let Some(model) = &request.model_name {
            if !ModelCatalog.validate(model) {
                list_models();
            }
        }
    }

    println!("\n{}", format_outcome(&outcome));

    if outcome.exit_code() != 0 {
        std::process::exit(outcome.exit_code());
    }

    Ok(())
}

/// A report that cannot be written never changes the run's exit code
fn save_report(summary: &RunSummary, path: &Path) {
    match write_summary(summary, path) {
        Ok(()) => println!(
            "\n{} Run report written to {} (ID: {})",
            INFO,
            style(path.display()).cyan(),
            style(&summary.run_id.to_string()[..8]).dim()
        ),
        Err(e) => error!("ERROR: {:#}", e),
    }
}
