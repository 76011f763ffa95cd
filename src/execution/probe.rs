//! Accelerator detection for the basecalling stage

use crate::core::ExecutionPath;
use crate::process::{CommandExecutor, CommandSpec};
use tracing::{debug, info};

/// Device-name substrings that qualify a GPU for accelerated basecalling
pub const QUALIFYING_MARKERS: [&str; 4] = ["Volta", "Ampere", "Hopper", "H100"];

/// The hardware-inventory query
pub fn device_query() -> CommandSpec {
    CommandSpec::new("nvidia-smi").args(["--query-gpu=name", "--format=csv,noheader"])
}

/// Classify the device-name text returned by the inventory query
///
/// Any marker anywhere in the text selects the accelerated path.
pub fn classify(device_names: &str) -> ExecutionPath {
    if QUALIFYING_MARKERS
        .iter()
        .any(|marker| device_names.contains(marker))
    {
        ExecutionPath::Accelerated
    } else {
        ExecutionPath::CpuOnly
    }
}

/// Selects the execution path once per run
pub struct CapabilityProbe<'a, E: ?Sized> {
    executor: &'a E,
}

impl<'a, E: CommandExecutor + ?Sized> CapabilityProbe<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    pub async fn detect(&self) -> ExecutionPath {
        let path = match self.executor.execute(&device_query()).await {
            Ok(result) if result.success() => {
                let names = result.stdout.trim();
                debug!("Device query returned: {}", names);
                classify(names)
            }
            Ok(result) => {
                debug!("Device query exited with {:?}, no usable GPU", result.exit_code);
                ExecutionPath::CpuOnly
            }
            Err(e) => {
                debug!("Device query unavailable: {}", e);
                ExecutionPath::CpuOnly
            }
        };

        info!("Selected execution path: {}", path);
        path
    }
}
