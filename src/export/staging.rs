use std::path::{Path, PathBuf};

use crate::foundation::error::{ClipError, ClipResult};

/// Temporary audio file next to the export target.
///
/// Removed by [`StagingFile::remove`] on the normal path; dropping an
/// unremoved guard deletes the file as well, so early returns and panics
/// cannot leave it behind.
#[derive(Debug)]
pub(crate) struct StagingFile {
    path: PathBuf,
    armed: bool,
}

impl StagingFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now. A file that was never created is not an error.
    pub(crate) fn remove(mut self) -> ClipResult<()> {
        self.armed = false;
        remove_if_exists(&self.path)
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if self.armed
            && let Err(e) = remove_if_exists(&self.path)
        {
            tracing::warn!(error = %e, "staging file left behind");
        }
    }
}

/// `remove_file` that treats an already-missing file as success.
pub(crate) fn remove_if_exists(path: &Path) -> ClipResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ClipError::cleanup_failed(format!(
            "failed to remove '{}': {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/staging.rs"]
mod tests;
