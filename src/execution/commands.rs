//! Command lines for the external bioinformatics tools

use crate::core::{Artifact, ExecutionPath, FileType, ModelIdentifier, PipelineConfig};
use crate::process::CommandSpec;

/// `pod5 convert fast5`; writes `output.pod5` into the pod5 directory
pub fn convert_legacy_signal(config: &PipelineConfig) -> CommandSpec {
    CommandSpec::new("pod5")
        .args(["convert", "fast5"])
        .path(config.path(Artifact::RawSignal(FileType::Fast5)))
        .arg("-o")
        .path(config.path(Artifact::RawSignal(FileType::Pod5)))
        .arg("-t")
        .arg(config.threads().to_string())
}

/// `dorado basecaller` with alignment against the reference; BAM goes to stdout
pub fn basecall(
    config: &PipelineConfig,
    model: &ModelIdentifier,
    path: ExecutionPath,
) -> CommandSpec {
    CommandSpec::new("dorado")
        .arg("basecaller")
        .args(["-x", path.device_flag()])
        .arg("--reference")
        .path(config.path(Artifact::Reference))
        .path(config.path(Artifact::ModelDir).join(model.as_str()))
        .path(config.path(Artifact::RawSignal(FileType::Pod5)))
        .stdout_to(config.path(Artifact::Alignment))
}

pub fn sort_alignment(config: &PipelineConfig) -> CommandSpec {
    CommandSpec::new("samtools")
        .arg("sort")
        .arg("--threads")
        .arg(config.threads().to_string())
        .path(config.path(Artifact::Alignment))
        .arg("-o")
        .path(config.path(Artifact::SortedAlignment))
}

pub fn index_alignment(config: &PipelineConfig) -> CommandSpec {
    CommandSpec::new("samtools")
        .arg("index")
        .arg("-@")
        .arg(config.threads().to_string())
        .path(config.path(Artifact::SortedAlignment))
}

/// `sniffles`; refuses an existing VCF unless `--allow-overwrite` is given
pub fn call_variants(config: &PipelineConfig) -> CommandSpec {
    CommandSpec::new("sniffles")
        .arg("-i")
        .path(config.path(Artifact::SortedAlignment))
        .arg("-v")
        .path(config.path(Artifact::VariantCalls))
        .arg("-t")
        .arg(config.threads().to_string())
        .arg("--allow-overwrite")
}
