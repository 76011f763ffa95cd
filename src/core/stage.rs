//! Stage and run-shape vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single stage of the pipeline
///
/// Stages always run in declaration order. Each stage consumes the output of
/// the stage before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Check the bucket and copy raw signal files down from object storage
    Staging,
    /// Convert legacy FAST5 input into POD5
    ConvertingLegacySignal,
    /// Basecall and align raw signal into a BAM file
    ConvertingToAlignment,
    /// Coordinate-sort the alignment
    Sorting,
    /// Index the sorted alignment
    Indexing,
    /// Call structural variants from the sorted alignment
    CallingVariants,
    /// Copy the variant calls back to object storage
    Publishing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Staging => "staging",
            Stage::ConvertingLegacySignal => "legacy-conversion",
            Stage::ConvertingToAlignment => "alignment",
            Stage::Sorting => "sorting",
            Stage::Indexing => "indexing",
            Stage::CallingVariants => "variant-calling",
            Stage::Publishing => "publishing",
        }
    }

    /// Operator-facing description, logged when the stage starts
    pub fn description(&self) -> &'static str {
        match self {
            Stage::Staging => "Copy raw signal files from object storage",
            Stage::ConvertingLegacySignal => "Convert fast5 to pod5",
            Stage::ConvertingToAlignment => "Convert pod5 to bam",
            Stage::Sorting => "Sort bam file",
            Stage::Indexing => "Create sorted bam index file",
            Stage::CallingVariants => "Perform structural variant calling",
            Stage::Publishing => "Copy VCF file to object storage",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw-signal input format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pod5,
    /// Legacy format, converted to pod5 before basecalling
    Fast5,
}

impl FileType {
    pub const ALL: [FileType; 2] = [FileType::Pod5, FileType::Fast5];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pod5 => "pod5",
            FileType::Fast5 => "fast5",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileType::ALL
            .into_iter()
            .find(|file_type| file_type.as_str() == s)
            .ok_or_else(|| format!("unsupported file type '{}' (expected pod5 or fast5)", s))
    }
}

/// Device selection for the basecalling stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPath {
    Accelerated,
    CpuOnly,
}

impl ExecutionPath {
    /// Value passed to the basecaller's `-x` flag
    pub fn device_flag(&self) -> &'static str {
        match self {
            ExecutionPath::Accelerated => "cuda:all",
            ExecutionPath::CpuOnly => "cpu",
        }
    }
}

impl fmt::Display for ExecutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPath::Accelerated => f.write_str("accelerated"),
            ExecutionPath::CpuOnly => f.write_str("cpu-only"),
        }
    }
}

/// Which stages a run will execute, in order
///
/// The core chain is fixed. Staging and publishing are included only when
/// staging is enabled; legacy conversion only for fast5 input.
pub fn plan(file_type: FileType, staging: bool) -> Vec<Stage> {
    let mut stages = Vec::with_capacity(7);
    if staging {
        stages.push(Stage::Staging);
    }
    if file_type == FileType::Fast5 {
        stages.push(Stage::ConvertingLegacySignal);
    }
    stages.extend([
        Stage::ConvertingToAlignment,
        Stage::Sorting,
        Stage::Indexing,
        Stage::CallingVariants,
    ]);
    if staging {
        stages.push(Stage::Publishing);
    }
    stages
}
