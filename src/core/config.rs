//! Run configuration derived from the deployment root and sample name

use crate::core::error::PipelineError;
use crate::core::stage::FileType;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Parallelism passed to the external tools
pub const THREADS: u32 = 14;

/// Reference genome shipped with every deployment
pub const REFERENCE_FILE_NAME: &str = "GCA_009914755.4_T2T-CHM13v2.0_genomic.fna.gz";

/// Recognized deployment hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    /// Sequencing-center workstation
    Development,
    /// Cloud GPU instance
    Production,
}

impl Deployment {
    /// Map a home directory onto a deployment
    pub fn from_home(home: &Path) -> Result<Self, PipelineError> {
        if home == Path::new("/home/seqcenter") {
            Ok(Deployment::Development)
        } else if home == Path::new("/home/ubuntu") {
            Ok(Deployment::Production)
        } else {
            Err(PipelineError::configuration(format!(
                "unknown home directory setting: {}",
                home.display()
            )))
        }
    }

    pub fn base_dir(&self) -> PathBuf {
        match self {
            Deployment::Development => PathBuf::from("/home/seqcenter/analyzer"),
            Deployment::Production => PathBuf::from("/home/ubuntu/analyzer"),
        }
    }
}

/// Validated sample identifier, safe to use as a single path component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SampleId(String);

fn sample_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9._-]*$").expect("valid sample regex"))
}

impl SampleId {
    pub fn new(raw: &str) -> Result<Self, PipelineError> {
        if sample_pattern().is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(PipelineError::configuration(format!(
                "invalid sample name '{}': use letters, digits, '.', '_' or '-'",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named artifacts a run reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Directory holding raw signal input of the given format
    RawSignal(FileType),
    /// Basecaller output
    Alignment,
    SortedAlignment,
    /// Index written next to the sorted alignment
    AlignmentIndex,
    VariantCalls,
    Reference,
    /// Directory containing the basecalling models
    ModelDir,
}

/// Immutable configuration for a single run
///
/// Every path is a pure function of the deployment base directory and the
/// sample identifier. Nothing here touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    deployment: Deployment,
    base_dir: PathBuf,
    sample: SampleId,
    threads: u32,
}

impl PipelineConfig {
    /// Derive the configuration for `sample` from the resolved home directory
    pub fn derive(home: &Path, sample: &str) -> Result<Self, PipelineError> {
        let deployment = Deployment::from_home(home)?;
        let sample = SampleId::new(sample)?;
        Ok(Self::for_deployment(deployment, sample))
    }

    pub fn for_deployment(deployment: Deployment, sample: SampleId) -> Self {
        Self {
            deployment,
            base_dir: deployment.base_dir(),
            sample,
            threads: THREADS,
        }
    }

    /// Root every path at `base_dir` instead of the deployment default
    ///
    /// Used by tests and dry runs against a scratch directory.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn deployment(&self) -> Deployment {
        self.deployment
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn sample(&self) -> &SampleId {
        &self.sample
    }

    pub fn threads(&self) -> u32 {
        self.threads
    }

    pub fn input_dir(&self) -> PathBuf {
        self.base_dir.join("data").join("INPUTS")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join("data").join("OUTPUTS")
    }

    pub fn raw_signal_dir(&self, file_type: FileType) -> PathBuf {
        match file_type {
            FileType::Pod5 => self.input_dir().join("POD5_FILES"),
            FileType::Fast5 => self.input_dir().join("FAST5_FILES"),
        }
    }

    pub fn alignment_dir(&self) -> PathBuf {
        self.input_dir().join("BAM_FILES")
    }

    pub fn reference_dir(&self) -> PathBuf {
        self.input_dir().join("REF_FILES")
    }

    pub fn variant_calls_dir(&self) -> PathBuf {
        self.output_dir().join("analyzer_output")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Resolve the path of a named artifact
    pub fn path(&self, artifact: Artifact) -> PathBuf {
        let sample = self.sample.as_str();
        match artifact {
            Artifact::RawSignal(file_type) => self.raw_signal_dir(file_type),
            Artifact::Alignment => self.alignment_dir().join(format!("{}.bam", sample)),
            Artifact::SortedAlignment => {
                self.alignment_dir().join(format!("{}.sorted.bam", sample))
            }
            Artifact::AlignmentIndex => {
                self.alignment_dir().join(format!("{}.sorted.bam.bai", sample))
            }
            Artifact::VariantCalls => {
                self.variant_calls_dir().join(format!("{}.vcf.gz", sample))
            }
            Artifact::Reference => self.reference_dir().join(REFERENCE_FILE_NAME),
            Artifact::ModelDir => self.base_dir.join("dorado_models"),
        }
    }

    /// Directories cleared by the workspace reset, in deletion order
    pub fn clearable_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.raw_signal_dir(FileType::Pod5),
            self.raw_signal_dir(FileType::Fast5),
            self.alignment_dir(),
            self.variant_calls_dir(),
            self.logs_dir(),
        ]
    }
}
