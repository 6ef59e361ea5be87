use std::path::PathBuf;

use crate::foundation::error::{ClipError, ClipResult};

/// Prefix used when the caller does not provide one.
pub const DEFAULT_FILENAME_PREFIX: &str = "video/ComfyUI";
/// Classification tag reported for exported files.
pub const OUTPUT_TYPE: &str = "output";

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 60;

/// Encoder settings forwarded verbatim to the media tool.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeParams {
    pub fps: u32,
    pub video_codec: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            fps: 24,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

impl EncodeParams {
    pub fn validate(&self) -> ClipResult<()> {
        if !(MIN_FPS..=MAX_FPS).contains(&self.fps) {
            return Err(ClipError::invalid_input(format!(
                "fps must be in {MIN_FPS}..={MAX_FPS}, got {}",
                self.fps
            )));
        }
        for (name, value) in [
            ("video codec", &self.video_codec),
            ("audio codec", &self.audio_codec),
            ("audio bitrate", &self.audio_bitrate),
        ] {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(ClipError::invalid_input(format!(
                    "{name} must be a non-empty token without whitespace, got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

/// What to export and how to encode it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRequest {
    /// `dir/sub/base` style prefix relative to the output directory.
    /// `%width%` and `%height%` expand to the clip size.
    pub filename_prefix: String,
    pub params: EncodeParams,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            params: EncodeParams::default(),
        }
    }
}

impl ExportRequest {
    pub fn new(filename_prefix: impl Into<String>) -> Self {
        Self {
            filename_prefix: filename_prefix.into(),
            params: EncodeParams::default(),
        }
    }

    pub fn with_params(mut self, params: EncodeParams) -> Self {
        self.params = params;
        self
    }
}

/// Where an export landed, in the shape the host UI expects.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ExportResult {
    pub filename: String,
    pub subfolder: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Absolute location on disk. Not part of the host payload.
    #[serde(skip)]
    pub path: PathBuf,
}

impl ExportResult {
    /// `{"ui": {"video": [result]}}`
    pub fn ui_payload(&self) -> serde_json::Value {
        serde_json::json!({ "ui": { "video": [self] } })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/request.rs"]
mod tests;
