/// Result alias used throughout the crate.
pub type ClipResult<T> = Result<T, ClipError>;

/// Error taxonomy for clip creation, audio inspection and export.
#[derive(thiserror::Error, Debug)]
pub enum ClipError {
    /// Malformed image or audio buffer, out-of-range parameter, or bad request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Audio staging or the encode/mux step failed.
    #[error("export failed: {0}")]
    ExportFailed(String),

    /// A staging file could not be removed. Only ever logged.
    #[error("resource cleanup failed: {0}")]
    ResourceCleanupFailed(String),

    /// Export was aborted through a [`crate::CancelToken`].
    #[error("export cancelled")]
    Cancelled,

    /// Configuration file could not be read or validated.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClipError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn export_failed(msg: impl Into<String>) -> Self {
        Self::ExportFailed(msg.into())
    }

    pub fn cleanup_failed(msg: impl Into<String>) -> Self {
        Self::ResourceCleanupFailed(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
