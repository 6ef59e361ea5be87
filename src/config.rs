//! Exporter configuration, loadable from JSON.

use std::path::{Path, PathBuf};

use crate::export::request::EncodeParams;
use crate::foundation::error::{ClipError, ClipResult};

/// Settings shared by every export of a process.
///
/// Missing fields take their defaults, unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExporterConfig {
    /// Root that filename prefixes are resolved against.
    pub output_dir: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    /// Colour transparent clip pixels are flattened over (RGBA8).
    pub background_rgba: [u8; 4],
    /// Encoder settings used when a request does not override them.
    pub defaults: EncodeParams,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            background_rgba: [0, 0, 0, 255],
            defaults: EncodeParams::default(),
        }
    }
}

impl ExporterConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> ClipResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ClipError::config(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
            .map_err(|e| ClipError::config(format!("'{}': {e}", path.display())))
    }

    pub fn from_json_str(text: &str) -> ClipResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| ClipError::config(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ClipResult<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ClipError::config("output_dir must not be empty"));
        }
        if self.ffmpeg_path.as_os_str().is_empty() || self.ffprobe_path.as_os_str().is_empty() {
            return Err(ClipError::config("ffmpeg_path/ffprobe_path must not be empty"));
        }
        self.defaults
            .validate()
            .map_err(|e| ClipError::config(format!("defaults: {e}")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
