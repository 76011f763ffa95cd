//! Local artifact housekeeping

use crate::core::{FileType, PipelineConfig, PipelineError};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// File name `pod5 convert` writes into the output directory
pub const CONVERTED_SIGNAL_FILE: &str = "output.pod5";

/// Deletes prior-run artifacts and moves converted files into place
pub struct Workspace<'a> {
    config: &'a PipelineConfig,
}

impl<'a> Workspace<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Delete everything inside the raw-signal, alignment, variant-call and
    /// log directories. Missing directories are skipped.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&self) -> Result<usize, PipelineError> {
        let mut removed = 0;
        for dir in self.config.clearable_dirs() {
            removed += clear_dir(&dir).map_err(|e| {
                PipelineError::workspace(format!("failed to clear {}: {}", dir.display(), e))
            })?;
        }
        info!("Cleared {} entries from the workspace", removed);
        Ok(removed)
    }

    /// Rename `output.pod5` to `{sample}.pod5` after legacy conversion
    pub fn rename_converted_signal(&self) -> Result<(), PipelineError> {
        let dir = self.config.raw_signal_dir(FileType::Pod5);
        let original = dir.join(CONVERTED_SIGNAL_FILE);
        let renamed = dir.join(format!("{}.pod5", self.config.sample()));

        fs::rename(&original, &renamed).map_err(|e| {
            PipelineError::workspace(format!(
                "failed to rename {} to {}: {}",
                original.display(),
                renamed.display(),
                e
            ))
        })?;
        info!("Renamed {} to {}", original.display(), renamed.display());
        Ok(())
    }
}

fn clear_dir(dir: &Path) -> io::Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Skipping missing directory {}", dir.display());
            return Ok(0);
        }
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        // symlink_metadata so links are removed, not followed
        if fs::symlink_metadata(&path)?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        debug!("Removed {}", path.display());
        removed += 1;
    }
    Ok(removed)
}
