use crate::{DiskSpeedError, Result, SCRATCH_FILE_NAME};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// The single file every I/O phase of a run targets.
///
/// Unlike a drop-guarded temp file, creation and removal are explicit so the
/// engine can log both outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Fixed location in the platform temporary directory
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(SCRATCH_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty file if none exists; existing contents are kept
    pub fn prepare(&self) -> Result<()> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map(|_| ())
            .map_err(|e| {
                DiskSpeedError::ScratchFileError(format!(
                    "Failed to create {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }

    /// Delete the file; a file that is already gone counts as removed
    pub fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DiskSpeedError::ScratchFileError(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

impl Default for ScratchFile {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}
