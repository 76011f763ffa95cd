//! Command-line interface

pub mod output;

use crate::core::PipelineError;
use crate::execution::{RunOptions, RunRequest};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Nanopore structural variant pipeline
#[derive(Debug, Parser, Clone)]
#[command(name = "analyzer")]
#[command(version)]
#[command(
    about = "Basecall, align, sort, index and call structural variants for one sample",
    long_about = "Basecall, align, sort, index and call structural variants for one sample.\n\n\
                  Run without a sample, file type or bucket to list the available models."
)]
pub struct Cli {
    /// Bucket for this run (required with --enable-staging)
    #[arg(short = 'b', long = "bucket-name", visible_alias = "bucketname")]
    pub bucket_name: Option<String>,

    /// Sample name for this run
    #[arg(short = 's', long = "sample-name", visible_alias = "samplename")]
    pub sample_name: Option<String>,

    /// Type of input file: pod5 or fast5
    #[arg(short = 'f', long = "file-type", visible_alias = "filetype")]
    pub file_type: Option<String>,

    /// Model name to use; omit the value to use the default model
    #[arg(
        short = 'm',
        long = "model-name",
        visible_alias = "modelname",
        num_args = 0..=1
    )]
    pub model_name: Option<Option<String>>,

    /// Copy raw signal from the bucket before basecalling and publish the VCF afterwards
    #[arg(long)]
    pub enable_staging: bool,

    /// Delete prior-run artifacts before starting
    #[arg(long)]
    pub clear_workspace: bool,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the invocation asks the tool to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print the model catalog and exit
    ListModels,
    /// Run the pipeline for one sample
    Run {
        sample_name: String,
        request: RunRequest,
        options: RunOptions,
    },
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn try_from_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    fn requested_model(&self) -> Option<String> {
        self.model_name.clone().flatten()
    }

    /// Decide between catalog listing and a pipeline run
    pub fn mode(&self) -> Result<Mode, PipelineError> {
        let nothing_else = self.bucket_name.is_none()
            && self.sample_name.is_none()
            && self.file_type.is_none();

        if nothing_else && self.requested_model().is_none() {
            return Ok(Mode::ListModels);
        }

        match (&self.sample_name, &self.file_type) {
            (Some(sample_name), Some(file_type)) => Ok(Mode::Run {
                sample_name: sample_name.clone(),
                request: RunRequest {
                    model_name: self.requested_model(),
                    file_type: file_type.clone(),
                    bucket_name: self.bucket_name.clone(),
                },
                options: RunOptions {
                    enable_staging: self.enable_staging,
                    clear_workspace: self.clear_workspace,
                },
            }),
            _ => Err(PipelineError::configuration(
                "the following arguments are required: -s/--sample-name, -f/--file-type",
            )),
        }
    }
}
