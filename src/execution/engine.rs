//! Main orchestrator - sequences the stages of a single run

use crate::{
    core::{
        stage::plan, Artifact, ExecutionPath, FileType, ModelCatalog, ModelIdentifier,
        PipelineConfig, PipelineError, RunOutcome, RunState, Stage, StageState,
    },
    execution::{
        commands,
        events::{EventBus, ExecutionEvent},
        probe::CapabilityProbe,
        runner::StageRunner,
    },
    process::CommandExecutor,
    transfer::ArtifactTransfer,
    workspace::Workspace,
};
use chrono::Utc;
use tracing::{error, info};

/// What the caller asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    /// Model name; the catalog default is used when absent
    pub model_name: Option<String>,
    /// Raw-signal format, `pod5` or `fast5`
    pub file_type: String,
    /// Bucket for staging and publishing
    pub bucket_name: Option<String>,
}

/// Optional pipeline extensions, all off by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Copy raw signal down from the bucket first and publish the VCF last
    pub enable_staging: bool,
    /// Delete prior-run artifacts before the first stage
    pub clear_workspace: bool,
}

/// A request that passed validation
#[derive(Debug, Clone)]
struct ValidatedRun {
    model: ModelIdentifier,
    file_type: FileType,
    bucket: Option<String>,
}

/// Runs the fixed stage sequence and aborts on the first failure
pub struct PipelineOrchestrator<E> {
    executor: E,
    transfer: Option<Box<dyn ArtifactTransfer>>,
    catalog: ModelCatalog,
    options: RunOptions,
    events: EventBus,
}

impl<E: CommandExecutor> PipelineOrchestrator<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            transfer: None,
            catalog: ModelCatalog,
            options: RunOptions::default(),
            events: EventBus::new(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_transfer<T: ArtifactTransfer + 'static>(mut self, transfer: T) -> Self {
        self.transfer = Some(Box::new(transfer));
        self
    }

    /// Add an event handler; handlers must be registered before `run`
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler);
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Execute one run for the sample in `config`
    pub async fn run(&self, config: &PipelineConfig, request: &RunRequest) -> RunOutcome {
        let mut outcome = RunOutcome::new(config.sample().clone());

        info!("Start Analyzer: sample {} ({})", config.sample(), outcome.run_id);
        self.events.emit(ExecutionEvent::RunStarted {
            run_id: outcome.run_id,
            sample: config.sample().to_string(),
        });

        let validated = match self.validate(request).await {
            Ok(validated) => validated,
            Err(e) => {
                error!("ERROR: {}", e);
                return self.finish_aborted(outcome, e);
            }
        };
        outcome.model = Some(validated.model.clone());
        info!("Using model {}", validated.model);

        if self.options.clear_workspace {
            info!("Clear files...");
            if let Err(e) = Workspace::new(config).clear() {
                error!("ERROR: Failed to clear files: {}", e);
                return self.finish_aborted(outcome, e);
            }
        }

        let path = CapabilityProbe::new(&self.executor).detect().await;
        outcome.execution_path = Some(path);
        self.events.emit(ExecutionEvent::PathSelected { path });

        let stages = plan(validated.file_type, self.options.enable_staging);
        outcome.plan(&stages);
        let total = stages.len();

        for (position, stage) in stages.into_iter().enumerate() {
            outcome.advance(RunState::from(stage));
            let started_at = Utc::now();
            if let Some(record) = outcome.stage_mut(stage) {
                record.state = StageState::Running { started_at };
            }

            info!("{}...", stage.description());
            self.events.emit(ExecutionEvent::StageStarted {
                stage,
                index: position + 1,
                total,
            });

            match self.run_stage(stage, config, &validated, path).await {
                Ok(()) => {
                    if let Some(record) = outcome.stage_mut(stage) {
                        record.state = StageState::Completed {
                            started_at,
                            completed_at: Utc::now(),
                        };
                    }
                    self.events.emit(ExecutionEvent::StageCompleted { stage });
                }
                Err(e) => {
                    error!("ERROR: Failed to {}: {}", stage.description().to_lowercase(), e);
                    if let Some(record) = outcome.stage_mut(stage) {
                        record.state = StageState::Failed {
                            error: e.to_string(),
                            started_at,
                            failed_at: Utc::now(),
                        };
                    }
                    self.events.emit(ExecutionEvent::StageFailed {
                        stage,
                        error: e.to_string(),
                    });
                    return self.finish_aborted(outcome, e);
                }
            }
        }

        outcome.complete();
        info!("Finish Analyzer: sample {} done", config.sample());
        self.events.emit(ExecutionEvent::RunFinished {
            run_id: outcome.run_id,
            state: outcome.state,
        });
        outcome
    }

    /// Check the request against the catalog and the run options
    async fn validate(&self, request: &RunRequest) -> Result<ValidatedRun, PipelineError> {
        let model = self.catalog.resolve(request.model_name.as_deref())?;
        let file_type: FileType = request
            .file_type
            .parse()
            .map_err(PipelineError::Configuration)?;

        let bucket = request
            .bucket_name
            .as_deref()
            .map(str::trim)
            .filter(|bucket| !bucket.is_empty())
            .map(str::to_string);

        if self.options.enable_staging {
            if bucket.is_none() {
                return Err(PipelineError::configuration(
                    "a bucket name is required when staging is enabled",
                ));
            }
            let transfer = self.transfer()?;
            transfer.check_credentials().await?;
        }

        Ok(ValidatedRun {
            model,
            file_type,
            bucket,
        })
    }

    fn transfer(&self) -> Result<&dyn ArtifactTransfer, PipelineError> {
        self.transfer
            .as_deref()
            .ok_or_else(|| {
                PipelineError::configuration("staging is enabled but no object storage is configured")
            })
    }

    fn bucket<'r>(&self, run: &'r ValidatedRun) -> Result<&'r str, PipelineError> {
        run.bucket
            .as_deref()
            .ok_or_else(|| PipelineError::configuration("no bucket name for staging"))
    }

    /// Execute a single stage
    async fn run_stage(
        &self,
        stage: Stage,
        config: &PipelineConfig,
        run: &ValidatedRun,
        path: ExecutionPath,
    ) -> Result<(), PipelineError> {
        let runner = StageRunner::new(&self.executor, &self.events);

        match stage {
            Stage::Staging => {
                let bucket = self.bucket(run)?;
                let transfer = self.transfer()?;
                if !transfer.bucket_exists(bucket).await? {
                    return Err(PipelineError::transfer(format!(
                        "bucket '{}' does not exist",
                        bucket
                    )));
                }
                transfer
                    .download_dir(bucket, &config.raw_signal_dir(run.file_type))
                    .await
            }
            Stage::ConvertingLegacySignal => {
                runner
                    .run(stage, &commands::convert_legacy_signal(config))
                    .await?;
                Workspace::new(config).rename_converted_signal()
            }
            Stage::ConvertingToAlignment => runner
                .run(stage, &commands::basecall(config, &run.model, path))
                .await
                .map(drop),
            Stage::Sorting => runner
                .run(stage, &commands::sort_alignment(config))
                .await
                .map(drop),
            Stage::Indexing => runner
                .run(stage, &commands::index_alignment(config))
                .await
                .map(drop),
            Stage::CallingVariants => runner
                .run(stage, &commands::call_variants(config))
                .await
                .map(drop),
            Stage::Publishing => {
                let bucket = self.bucket(run)?;
                self.transfer()?
                    .upload_file(&config.path(Artifact::VariantCalls), bucket)
                    .await
            }
        }
    }

    fn finish_aborted(&self, mut outcome: RunOutcome, error: PipelineError) -> RunOutcome {
        outcome.abort(error);
        self.events.emit(ExecutionEvent::RunFinished {
            run_id: outcome.run_id,
            state: outcome.state,
        });
        outcome
    }
}
